//! Credentials and request signing for the Crypto.com Exchange
//!
//! Private endpoints authenticate every call with a signature computed over
//! a canonical rendering of the request parameters. This crate provides:
//!
//! - [`Credentials`] - API key and secret (secret zeroized on drop)
//! - [`Params`] / [`ParamValue`] - sorted parameter sets with canonical rendering
//! - [`RequestSigner`] / [`SigningScheme`] - both signing schemes used by the exchange
//!
//! # Example
//!
//! ```
//! use cdc_auth::{Credentials, Params, RequestSigner, SigningScheme};
//!
//! let creds = Credentials::new("api-key", "api-secret").unwrap();
//! let params = Params::new()
//!     .with("instrument_name", "ETH_BTC")
//!     .with("order_id", "1234");
//!
//! let signer = RequestSigner::new(&creds, SigningScheme::HmacSha256);
//! let signed = signer.sign("private/get-order-detail", params, 1587846358253);
//! assert_eq!(signed.signature.len(), 64);
//! ```

mod credentials;
mod error;
mod params;
mod signer;

pub use credentials::{generate_nonce, Credentials, API_KEY_ENV, API_SECRET_ENV};
pub use error::{AuthError, AuthResult};
pub use params::{ParamValue, Params};
pub use signer::{
    canonical_string, RequestSigner, SignedRequest, SigningScheme, REQUEST_ID, V1_API_KEY_FIELD,
    V1_TIME_FIELD,
};
