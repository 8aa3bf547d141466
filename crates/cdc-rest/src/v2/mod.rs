//! v2 API: JSON bodies signed with HMAC-SHA256
//!
//! Endpoints live under `https://api.crypto.com/v2/`. Public methods are
//! `GET public/...`, private methods are `POST private/...` with the method
//! name repeated in the JSON body.

mod client;
mod types;

pub use client::Client;
pub use types::{Account, BookEntry, Instrument, NewOrder, Order, OrderBook, Ticker, Trade};
