//! v2 request and response types
//!
//! Absent fields decode to zero values. Amounts use `Decimal`.

use cdc_types::{OrderSide, OrderStatus, OrderType, Symbol};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::de::{millis_to_datetime, nullable, string_or_number};

// ============================================================================
// Market data
// ============================================================================

/// Tradable instrument
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Instrument {
    /// Instrument name (e.g., "ETH_BTC")
    pub instrument_name: String,
    /// Quote currency (e.g., "BTC")
    pub quote_currency: String,
    /// Base currency (e.g., "ETH")
    pub base_currency: String,
    /// Maximum decimal places for prices
    pub price_decimals: u32,
    /// Maximum decimal places for quantities
    pub quantity_decimals: u32,
    /// Maximum order quantity
    #[serde(deserialize_with = "nullable")]
    pub max_quantity: Decimal,
    /// Minimum order quantity
    #[serde(deserialize_with = "nullable")]
    pub min_quantity: Decimal,
    /// Whether margin trading is enabled
    pub margin_trading_enabled: bool,
}

impl Instrument {
    /// Instrument name as a symbol
    pub fn symbol(&self) -> Symbol {
        Symbol::new(self.instrument_name.clone())
    }
}

/// 24h ticker
///
/// Field names follow the exchange's single-letter keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ticker {
    /// Instrument name
    #[serde(rename = "i")]
    pub instrument_name: String,
    /// Price of the latest trade (zero if there were no trades)
    #[serde(rename = "a", deserialize_with = "nullable")]
    pub last: Decimal,
    /// Best bid price
    #[serde(rename = "b", deserialize_with = "nullable")]
    pub best_bid: Decimal,
    /// Best ask price
    #[serde(rename = "k", deserialize_with = "nullable")]
    pub best_ask: Decimal,
    /// 24h traded volume
    #[serde(rename = "v", deserialize_with = "nullable")]
    pub volume: Decimal,
    /// 24h high
    #[serde(rename = "h", deserialize_with = "nullable")]
    pub high: Decimal,
    /// 24h low
    #[serde(rename = "l", deserialize_with = "nullable")]
    pub low: Decimal,
    /// 24h price change
    #[serde(rename = "c", deserialize_with = "nullable")]
    pub change: Decimal,
    /// Timestamp (milliseconds)
    #[serde(rename = "t")]
    pub timestamp: i64,
}

/// Order book level: `[price, size, order count]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookEntry(pub Vec<Decimal>);

impl BookEntry {
    /// Price level
    pub fn price(&self) -> Decimal {
        self.0.first().copied().unwrap_or_default()
    }

    /// Quantity at this level
    pub fn size(&self) -> Decimal {
        self.0.get(1).copied().unwrap_or_default()
    }

    /// Number of orders at this level, when reported
    pub fn orders(&self) -> Option<Decimal> {
        self.0.get(2).copied()
    }
}

/// Order book snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderBook {
    /// Bid levels, best first
    pub bids: Vec<BookEntry>,
    /// Ask levels, best first
    pub asks: Vec<BookEntry>,
    /// Snapshot timestamp (milliseconds)
    #[serde(rename = "t")]
    pub timestamp: i64,
}

impl OrderBook {
    /// Best bid level
    pub fn best_bid(&self) -> Option<&BookEntry> {
        self.bids.first()
    }

    /// Best ask level
    pub fn best_ask(&self) -> Option<&BookEntry> {
        self.asks.first()
    }

    /// Best ask minus best bid
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()?.price() - self.best_bid()?.price())
    }

    /// Midpoint between best bid and best ask
    pub fn mid_price(&self) -> Option<Decimal> {
        Some((self.best_ask()?.price() + self.best_bid()?.price()) / Decimal::TWO)
    }
}

// ============================================================================
// Account
// ============================================================================

/// Balance of one currency
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    /// Total balance
    #[serde(deserialize_with = "nullable")]
    pub balance: Decimal,
    /// Available balance (not in orders, not locked)
    #[serde(deserialize_with = "nullable")]
    pub available: Decimal,
    /// Balance locked in orders
    #[serde(deserialize_with = "nullable")]
    pub order: Decimal,
    /// Balance locked for staking
    #[serde(deserialize_with = "nullable")]
    pub stake: Decimal,
    /// Currency (e.g., "CRO")
    pub currency: String,
}

// ============================================================================
// Orders and trades
// ============================================================================

/// New order parameters
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    /// Instrument name
    pub instrument_name: String,
    /// Side
    pub side: OrderSide,
    /// Order type
    pub order_type: OrderType,
    /// Quantity
    pub quantity: Decimal,
    /// Limit price (sent only for types that take one)
    pub price: Decimal,
    /// Trigger price for stop and take-profit types
    pub trigger_price: Option<Decimal>,
    /// Client order id
    ///
    /// The exchange does not deduplicate on it, but it lets a caller find an
    /// order placed by a retried request.
    pub client_oid: Option<String>,
}

impl NewOrder {
    /// Create an order
    pub fn new(
        instrument_name: impl Into<String>,
        side: OrderSide,
        order_type: OrderType,
        quantity: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            instrument_name: instrument_name.into(),
            side,
            order_type,
            quantity,
            price,
            trigger_price: None,
            client_oid: None,
        }
    }

    /// Create a limit order
    pub fn limit(
        instrument_name: impl Into<String>,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
    ) -> Self {
        Self::new(instrument_name, side, OrderType::Limit, quantity, price)
    }

    /// Create a market order
    pub fn market(instrument_name: impl Into<String>, side: OrderSide, quantity: Decimal) -> Self {
        Self::new(instrument_name, side, OrderType::Market, quantity, Decimal::ZERO)
    }

    /// Set the trigger price
    pub fn with_trigger_price(mut self, trigger_price: Decimal) -> Self {
        self.trigger_price = Some(trigger_price);
        self
    }

    /// Set a client order id
    pub fn with_client_oid(mut self, client_oid: impl Into<String>) -> Self {
        self.client_oid = Some(client_oid.into());
        self
    }
}

/// Order as reported by the exchange
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    /// Exchange order id
    #[serde(deserialize_with = "string_or_number")]
    pub order_id: String,
    /// Client order id
    #[serde(deserialize_with = "string_or_number")]
    pub client_oid: String,
    /// Instrument name
    pub instrument_name: String,
    /// Status name (`ACTIVE`, `FILLED`, `CANCELED`, `REJECTED`, `EXPIRED`)
    pub status: String,
    /// Reason code or text for rejected orders
    #[serde(deserialize_with = "string_or_number")]
    pub reason: String,
    /// Side name
    pub side: String,
    /// Type name
    #[serde(rename = "type")]
    pub order_type: String,
    /// Limit price
    #[serde(deserialize_with = "nullable")]
    pub price: Decimal,
    /// Ordered quantity
    #[serde(deserialize_with = "nullable")]
    pub quantity: Decimal,
    /// Executed quantity
    #[serde(deserialize_with = "nullable")]
    pub cumulative_quantity: Decimal,
    /// Executed notional
    #[serde(deserialize_with = "nullable")]
    pub cumulative_value: Decimal,
    /// Average execution price
    #[serde(deserialize_with = "nullable")]
    pub avg_price: Decimal,
    /// Fee currency
    pub fee_currency: String,
    /// Time in force
    pub time_in_force: String,
    /// Creation time (milliseconds)
    pub create_time: i64,
    /// Last update time (milliseconds)
    pub update_time: i64,
}

impl Order {
    /// Parsed side
    pub fn side(&self) -> Option<OrderSide> {
        self.side.parse().ok()
    }

    /// Parsed order type
    pub fn order_type(&self) -> Option<OrderType> {
        self.order_type.parse().ok()
    }

    /// Normalized status
    pub fn status(&self) -> OrderStatus {
        OrderStatus::from_v2_str(&self.status)
    }

    /// Creation time
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        millis_to_datetime(self.create_time)
    }

    /// Last update time
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        millis_to_datetime(self.update_time)
    }

    /// Instrument as a symbol
    pub fn symbol(&self) -> Symbol {
        Symbol::new(self.instrument_name.clone())
    }
}

/// Executed trade
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trade {
    /// Trade id
    #[serde(deserialize_with = "string_or_number")]
    pub trade_id: String,
    /// Order id the trade belongs to
    #[serde(deserialize_with = "string_or_number")]
    pub order_id: String,
    /// Instrument name
    pub instrument_name: String,
    /// Side name
    pub side: String,
    /// Execution price
    #[serde(deserialize_with = "nullable")]
    pub traded_price: Decimal,
    /// Executed quantity
    #[serde(deserialize_with = "nullable")]
    pub traded_quantity: Decimal,
    /// Fee charged
    #[serde(deserialize_with = "nullable")]
    pub fee: Decimal,
    /// Fee currency
    pub fee_currency: String,
    /// `TAKER` or `MAKER`
    pub liquidity_indicator: String,
    /// Execution time (milliseconds)
    pub create_time: i64,
}

impl Trade {
    /// Parsed side
    pub fn side(&self) -> Option<OrderSide> {
        self.side.parse().ok()
    }

    /// Execution time
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        millis_to_datetime(self.create_time)
    }

    /// Executed notional
    pub fn notional(&self) -> Decimal {
        self.traded_price * self.traded_quantity
    }
}

// ============================================================================
// Result wrappers
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct InstrumentsResult {
    pub instruments: Vec<Instrument>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct DataResult<T> {
    pub data: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AccountsResult {
    pub accounts: Vec<Account>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CreateOrderResult {
    #[serde(deserialize_with = "string_or_number")]
    pub order_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct OrderDetailResult {
    pub order_info: Order,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct OrderListResult {
    pub count: usize,
    pub order_list: Vec<Order>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct TradeListResult {
    pub count: usize,
    pub trade_list: Vec<Trade>,
}
