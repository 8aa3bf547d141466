//! v1 API: form bodies signed with SHA256 over the sorted parameters
//!
//! Endpoints live under `https://api.crypto.com/v1/`. Market data is read
//! with `GET`, everything private is a form `POST` carrying `api_key`,
//! `time` and `sign`. Envelopes are `{code: "0", msg: "suc", data}`.

mod client;
mod types;

pub use client::{Client, PAGE_SIZE};
pub use types::{
    AccountSummary, CoinBalance, Order, OrderBook, OrderDetail, SymbolInfo, Ticker, TickerEntry,
    Tickers, Trade,
};

/// Order book level, shared with v2
pub use crate::v2::BookEntry;
