//! v1 response types
//!
//! v1 reports base and quote coins separately, uses numeric order types and
//! statuses, and sends most numbers as strings.

use cdc_types::{OrderSide, OrderStatus, OrderType, Symbol};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::de::{millis_to_datetime, nullable, string_or_number};
use crate::v2::BookEntry;

/// Tradable pair
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolInfo {
    /// Wire name (e.g., "ethbtc")
    pub symbol: String,
    /// Base coin (e.g., "ETH")
    pub base_coin: String,
    /// Quote coin (e.g., "BTC")
    pub count_coin: String,
    /// Decimal places for prices
    pub price_precision: u32,
    /// Decimal places for amounts
    pub amount_precision: u32,
}

impl SymbolInfo {
    /// Pair as a `BASE_QUOTE` symbol
    pub fn pair(&self) -> Symbol {
        Symbol::from_parts(&self.base_coin, &self.count_coin)
    }
}

/// Entry of the all-tickers response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerEntry {
    /// Wire name
    pub symbol: String,
    /// Last traded price
    #[serde(deserialize_with = "nullable")]
    pub last: Decimal,
    /// Best bid
    #[serde(deserialize_with = "nullable")]
    pub buy: Decimal,
    /// Best ask
    #[serde(deserialize_with = "nullable")]
    pub sell: Decimal,
    /// 24h high
    #[serde(deserialize_with = "nullable")]
    pub high: Decimal,
    /// 24h low
    #[serde(deserialize_with = "nullable")]
    pub low: Decimal,
    /// 24h volume
    #[serde(deserialize_with = "nullable")]
    pub vol: Decimal,
    /// 24h change
    #[serde(deserialize_with = "nullable")]
    pub change: Decimal,
    /// 24h change ratio
    #[serde(deserialize_with = "nullable")]
    pub rose: Decimal,
}

/// All tickers with the server time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tickers {
    /// Server time (milliseconds)
    pub date: i64,
    /// Tickers
    pub ticker: Vec<TickerEntry>,
}

/// Ticker of one pair
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ticker {
    /// Last traded price
    #[serde(deserialize_with = "nullable")]
    pub last: Decimal,
    /// Best bid
    #[serde(deserialize_with = "nullable")]
    pub buy: Decimal,
    /// Best ask
    #[serde(deserialize_with = "nullable")]
    pub sell: Decimal,
    /// 24h high
    #[serde(deserialize_with = "nullable")]
    pub high: Decimal,
    /// 24h low
    #[serde(deserialize_with = "nullable")]
    pub low: Decimal,
    /// 24h volume
    #[serde(deserialize_with = "nullable")]
    pub vol: Decimal,
    /// 24h change ratio
    #[serde(deserialize_with = "nullable")]
    pub rose: Decimal,
    /// Server time (milliseconds)
    pub time: i64,
}

/// Order book snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderBook {
    /// Ask levels `[price, volume]`
    pub asks: Vec<BookEntry>,
    /// Bid levels `[price, volume]`
    pub bids: Vec<BookEntry>,
    /// Snapshot time (milliseconds)
    pub time: i64,
}

/// Balance of one coin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinBalance {
    /// Coin (e.g., "eth")
    pub coin: String,
    /// Available balance
    #[serde(deserialize_with = "nullable")]
    pub normal: Decimal,
    /// Balance locked in orders
    #[serde(deserialize_with = "nullable")]
    pub locked: Decimal,
    /// BTC valuation (the exchange spells it `btcValuatin`)
    #[serde(rename = "btcValuatin", deserialize_with = "nullable")]
    pub btc_valuation: Decimal,
}

impl CoinBalance {
    /// Available plus locked
    pub fn total(&self) -> Decimal {
        self.normal + self.locked
    }
}

/// Account summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountSummary {
    /// Total asset value in BTC
    #[serde(deserialize_with = "nullable")]
    pub total_asset: Decimal,
    /// Per-coin balances
    pub coin_list: Vec<CoinBalance>,
}

impl AccountSummary {
    /// Balance of a coin, matched case-insensitively
    pub fn coin(&self, coin: &str) -> Option<&CoinBalance> {
        self.coin_list
            .iter()
            .find(|c| c.coin.eq_ignore_ascii_case(coin))
    }
}

/// Order as reported by the exchange
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    /// Order id
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Side name
    pub side: String,
    /// Side in the user's locale
    pub side_msg: String,
    /// Numeric type (`1` limit, `2` market)
    #[serde(rename = "type", deserialize_with = "string_or_number")]
    pub order_type: String,
    /// Numeric status
    pub status: i64,
    /// Status in the user's locale
    pub status_msg: String,
    /// Base coin
    #[serde(rename = "baseCoin")]
    pub base_coin: String,
    /// Quote coin
    #[serde(rename = "countCoin")]
    pub count_coin: String,
    /// Limit price
    #[serde(deserialize_with = "nullable")]
    pub price: Decimal,
    /// Ordered volume
    #[serde(deserialize_with = "nullable")]
    pub volume: Decimal,
    /// Executed volume
    #[serde(deserialize_with = "nullable")]
    pub deal_volume: Decimal,
    /// Remaining volume
    #[serde(deserialize_with = "nullable")]
    pub remain_volume: Decimal,
    /// Executed notional
    #[serde(deserialize_with = "nullable")]
    pub deal_price: Decimal,
    /// Average execution price
    #[serde(deserialize_with = "nullable")]
    pub avg_price: Decimal,
    /// Total price
    #[serde(deserialize_with = "nullable")]
    pub total_price: Decimal,
    /// Fee charged
    #[serde(deserialize_with = "nullable")]
    pub fee: Decimal,
    /// Fee coin
    pub fee_coin: String,
    /// Order source
    pub source: i64,
    /// Creation time (milliseconds)
    pub created_at: i64,
    /// Last update time (milliseconds)
    pub updated_at: i64,
}

impl Order {
    /// Parsed side
    pub fn side(&self) -> Option<OrderSide> {
        self.side.parse().ok()
    }

    /// Parsed order type
    pub fn order_type(&self) -> Option<OrderType> {
        self.order_type
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(OrderType::from_v1_code)
    }

    /// Normalized status
    pub fn status(&self) -> OrderStatus {
        OrderStatus::from_v1_code(self.status)
    }

    /// Creation time
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        millis_to_datetime(self.created_at)
    }

    /// Last update time
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        millis_to_datetime(self.updated_at)
    }

    /// Pair as a `BASE_QUOTE` symbol
    pub fn symbol(&self) -> Symbol {
        Symbol::from_parts(&self.base_coin, &self.count_coin)
    }
}

/// Executed trade
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trade {
    /// Trade id
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Wire name of the pair
    pub symbol: String,
    /// Side name
    pub side: String,
    /// Trade type
    #[serde(rename = "type", deserialize_with = "string_or_number")]
    pub trade_type: String,
    /// Execution price
    #[serde(deserialize_with = "nullable")]
    pub price: Decimal,
    /// Executed volume
    #[serde(deserialize_with = "nullable")]
    pub volume: Decimal,
    /// Executed notional
    #[serde(deserialize_with = "nullable")]
    pub deal_price: Decimal,
    /// Fee charged
    #[serde(deserialize_with = "nullable")]
    pub fee: Decimal,
    /// Fee coin
    #[serde(rename = "feeCoin")]
    pub fee_coin: String,
    /// Execution time (milliseconds)
    pub ctime: i64,
}

impl Trade {
    /// Parsed side
    pub fn side(&self) -> Option<OrderSide> {
        self.side.parse().ok()
    }

    /// Execution time
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        millis_to_datetime(self.ctime)
    }
}

/// Order with its fills
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderDetail {
    /// Order
    pub order_info: Order,
    /// Fills of the order
    pub trade_list: Vec<Trade>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct DepthResult {
    pub tick: OrderBook,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CreateOrderResult {
    #[serde(deserialize_with = "string_or_number")]
    pub order_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, bound(deserialize = "T: Deserialize<'de> + Default"))]
pub(crate) struct ListResult<T> {
    #[serde(deserialize_with = "nullable")]
    pub count: usize,
    #[serde(rename = "resultList", deserialize_with = "nullable")]
    pub result_list: Vec<T>,
}
