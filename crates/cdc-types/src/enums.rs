//! Side, OrderType and OrderStatus enums
//!
//! The two API generations encode the same concepts differently: v2 uses
//! upper-case names everywhere, v1 uses numeric codes for order types and
//! statuses. Each enum carries both mappings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    /// Buy order
    Buy,
    /// Sell order
    Sell,
}

impl OrderSide {
    /// Returns the side as used on the wire (both API versions)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }

    /// Returns the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderSide {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            _ => Err(UnknownVariant {
                kind: "order side",
                value: s.to_string(),
            }),
        }
    }
}

/// Order types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Limit order - executes at specified price or better
    Limit,
    /// Market order - executes immediately at best available price
    Market,
    /// Stop-loss order
    StopLoss,
    /// Stop-limit order
    StopLimit,
    /// Take-profit order
    TakeProfit,
    /// Take-profit limit order
    TakeProfitLimit,
}

impl OrderType {
    /// Name used by the v2 API
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Limit => "LIMIT",
            Self::Market => "MARKET",
            Self::StopLoss => "STOP_LOSS",
            Self::StopLimit => "STOP_LIMIT",
            Self::TakeProfit => "TAKE_PROFIT",
            Self::TakeProfitLimit => "TAKE_PROFIT_LIMIT",
        }
    }

    /// Numeric code used by the v1 API (only limit and market exist there)
    pub fn v1_code(&self) -> Option<u8> {
        match self {
            Self::Limit => Some(1),
            Self::Market => Some(2),
            _ => None,
        }
    }

    /// Parse a v1 numeric code
    pub fn from_v1_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Limit),
            2 => Some(Self::Market),
            _ => None,
        }
    }

    /// Whether a limit price must accompany this order type
    pub fn requires_price(&self) -> bool {
        matches!(self, Self::Limit | Self::StopLimit | Self::TakeProfitLimit)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LIMIT" | "1" => Ok(Self::Limit),
            "MARKET" | "2" => Ok(Self::Market),
            "STOP_LOSS" => Ok(Self::StopLoss),
            "STOP_LIMIT" => Ok(Self::StopLimit),
            "TAKE_PROFIT" => Ok(Self::TakeProfit),
            "TAKE_PROFIT_LIMIT" => Ok(Self::TakeProfitLimit),
            _ => Err(UnknownVariant {
                kind: "order type",
                value: s.to_string(),
            }),
        }
    }
}

/// Lifecycle status of an order, normalized across API versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    /// Accepted but not yet working (v1 status 0)
    Init,
    /// Working on the book
    Active,
    /// Fully filled
    Filled,
    /// Partially filled and still working
    PartiallyFilled,
    /// Cancelled
    Canceled,
    /// Cancellation requested
    PendingCancel,
    /// Rejected by the matching engine
    Rejected,
    /// Expired or abnormal (v1 status 6)
    Expired,
    /// Status not recognized
    #[default]
    Unknown,
}

impl OrderStatus {
    /// Map a v1 numeric status
    pub fn from_v1_code(code: i64) -> Self {
        match code {
            0 => Self::Init,
            1 => Self::Active,
            2 => Self::Filled,
            3 => Self::PartiallyFilled,
            4 => Self::Canceled,
            5 => Self::PendingCancel,
            6 => Self::Expired,
            _ => Self::Unknown,
        }
    }

    /// Map a v2 status name
    pub fn from_v2_str(s: &str) -> Self {
        match s {
            "ACTIVE" => Self::Active,
            "FILLED" => Self::Filled,
            "CANCELED" => Self::Canceled,
            "REJECTED" => Self::Rejected,
            "EXPIRED" => Self::Expired,
            _ => Self::Unknown,
        }
    }

    /// Returns true once the order can no longer change
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Filled | Self::Canceled | Self::Rejected | Self::Expired
        )
    }
}

/// A wire value that did not match any known variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    /// Which enum was being parsed
    pub kind: &'static str,
    /// The rejected value
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_parse_is_case_insensitive() {
        assert_eq!("buy".parse::<OrderSide>().unwrap(), OrderSide::Buy);
        assert_eq!("SELL".parse::<OrderSide>().unwrap(), OrderSide::Sell);
        assert!("hold".parse::<OrderSide>().is_err());
        assert_eq!(OrderSide::Buy.opposite(), OrderSide::Sell);
    }

    #[test]
    fn test_order_type_codes() {
        assert_eq!(OrderType::Limit.v1_code(), Some(1));
        assert_eq!(OrderType::Market.v1_code(), Some(2));
        assert_eq!(OrderType::StopLoss.v1_code(), None);
        assert_eq!(OrderType::from_v1_code(2), Some(OrderType::Market));
        assert_eq!("2".parse::<OrderType>().unwrap(), OrderType::Market);
        assert_eq!(OrderType::StopLimit.to_string(), "STOP_LIMIT");
    }

    #[test]
    fn test_requires_price() {
        assert!(OrderType::Limit.requires_price());
        assert!(OrderType::StopLimit.requires_price());
        assert!(!OrderType::Market.requires_price());
        assert!(!OrderType::StopLoss.requires_price());
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(OrderStatus::from_v1_code(6), OrderStatus::Expired);
        assert_eq!(OrderStatus::from_v1_code(42), OrderStatus::Unknown);
        assert_eq!(OrderStatus::from_v2_str("REJECTED"), OrderStatus::Rejected);
        assert!(OrderStatus::Filled.is_terminal());
        assert!(!OrderStatus::Active.is_terminal());
    }
}
