//! REST bindings for the Crypto.com Exchange
//!
//! This crate provides clients for both API generations (v1 and v2) on top
//! of one request pipeline: a pacer that spaces requests out, a signer, an
//! HTTP transport and envelope interpretation.
//!
//! # Features
//!
//! - **Market Data**: Instruments, tickers, order books
//! - **Account**: Balances
//! - **Trading**: Place and cancel orders, open orders, trade history
//!
//! # Rate Limiting
//!
//! Every call goes through an [`AdaptivePacer`]. By default it allows 100
//! requests per second; endpoints with a tighter published limit ask for
//! their own rate. After an HTTP 429 the next request waits 60 seconds and
//! the rejected call is retried.
//!
//! # Example
//!
//! ```no_run
//! use cdc_rest::{v2, ClientConfig, Credentials};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Public endpoints (no auth required)
//!     let client = v2::Client::new()?;
//!     let book = client.order_book("ETH_BTC").await?;
//!     println!("best bid: {:?}", book.best_bid());
//!
//!     // Private endpoints (auth required)
//!     let config = ClientConfig::new()
//!         .with_credentials(Credentials::from_env()?)
//!         .with_max_rate_limit_retries(5);
//!     let auth_client = v2::Client::with_config(config)?;
//!     for order in auth_client.open_orders("").await? {
//!         println!("{} {} {}", order.order_id, order.side, order.quantity);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod expiry;
pub mod hooks;
pub mod pacer;
pub mod pagination;
pub mod protocol;
pub mod transport;
pub mod v1;
pub mod v2;

mod de;

// Re-export main types
pub use config::ClientConfig;
pub use dispatcher::Dispatcher;
pub use error::{RestError, RestResult};
pub use hooks::{PacerHooks, WaitInfo};
pub use pacer::{AdaptivePacer, Pacer};
pub use pagination::{collect_pages, Page};
pub use protocol::ProtocolVariant;
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};

#[cfg(any(test, feature = "test-utils"))]
pub use transport::MockTransport;

pub use cdc_auth::{Credentials, Params};
