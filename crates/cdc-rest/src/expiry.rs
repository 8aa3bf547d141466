//! Diagnostics for orders that expire right after placement
//!
//! An order that expires immediately almost always lacked funds. The message
//! names what was attempted and the balance that was available at the time;
//! the balance is looked up after the fact and may already have changed.

use cdc_types::{OrderSide, Symbol};
use rust_decimal::Decimal;

/// Inputs for the expired-order message
#[derive(Debug, Clone, PartialEq)]
pub struct ExpiredOrder {
    /// Side of the order
    pub side: OrderSide,
    /// Ordered quantity
    pub quantity: Decimal,
    /// Base currency
    pub base: String,
    /// Quote currency
    pub quote: String,
    /// Order price, or the last traded price for market orders
    pub price: Decimal,
    /// Currency the order spends: base when selling, quote when buying
    pub balance_currency: String,
    /// Available balance of `balance_currency` (zero when unknown)
    pub available: Decimal,
}

impl ExpiredOrder {
    /// Start a diagnostic for an order on `symbol`
    pub fn new(symbol: &str, side: OrderSide, quantity: Decimal, price: Decimal) -> Self {
        let parsed = Symbol::new(symbol);
        let base = parsed.base().unwrap_or(symbol).to_string();
        let quote = parsed.quote().unwrap_or_default().to_string();
        let balance_currency = match side {
            OrderSide::Sell => base.clone(),
            OrderSide::Buy => quote.clone(),
        };

        Self {
            side,
            quantity,
            base,
            quote,
            price,
            balance_currency,
            available: Decimal::ZERO,
        }
    }

    /// Human-readable message
    pub fn message(&self) -> String {
        format!(
            "cannot {} {} unit(s) of {} at {} {}. your available balance is {} {}",
            self.side,
            self.quantity.normalize(),
            self.base,
            self.quote,
            self.price.normalize(),
            self.balance_currency,
            self.available.normalize()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_buy_spends_quote() {
        let mut expired = ExpiredOrder::new("ETH_BTC", OrderSide::Buy, dec!(1.50), dec!(0.0300));
        expired.available = dec!(0.01);

        assert_eq!(expired.balance_currency, "BTC");
        assert_eq!(
            expired.message(),
            "cannot BUY 1.5 unit(s) of ETH at BTC 0.03. your available balance is BTC 0.01"
        );
    }

    #[test]
    fn test_sell_spends_base() {
        let expired = ExpiredOrder::new("CRO/USDT", OrderSide::Sell, dec!(100), dec!(0.12));
        assert_eq!(expired.base, "CRO");
        assert_eq!(expired.quote, "USDT");
        assert_eq!(expired.balance_currency, "CRO");
        assert!(expired.message().ends_with("your available balance is CRO 0"));
    }

    #[test]
    fn test_unsplittable_symbol() {
        let expired = ExpiredOrder::new("ethbtc", OrderSide::Sell, dec!(1), dec!(1));
        assert_eq!(expired.base, "ethbtc");
        assert_eq!(expired.quote, "");
    }
}
