//! Instrument names (ETH_BTC format)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Instrument name
///
/// v2 names are upper-case and underscore separated (`ETH_BTC`); v1 used
/// lower-case concatenated names (`ethbtc`) on the wire but reports base and
/// quote coins separately. Slash separated names are accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// ETH/BTC instrument
    pub const ETH_BTC: &'static str = "ETH_BTC";
    /// BTC/USDT instrument
    pub const BTC_USDT: &'static str = "BTC_USDT";
    /// CRO/USDT instrument
    pub const CRO_USDT: &'static str = "CRO_USDT";

    /// Create a new symbol from a string
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Build a symbol from its base and quote currencies
    pub fn from_parts(base: &str, quote: &str) -> Self {
        Self(format!(
            "{}_{}",
            base.to_ascii_uppercase(),
            quote.to_ascii_uppercase()
        ))
    }

    /// Get the symbol as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn split(&self) -> Option<(&str, &str)> {
        self.0
            .split_once('_')
            .or_else(|| self.0.split_once('/'))
    }

    /// Get the base currency (e.g., "ETH" from "ETH_BTC")
    pub fn base(&self) -> Option<&str> {
        self.split().map(|(base, _)| base)
    }

    /// Get the quote currency (e.g., "BTC" from "ETH_BTC")
    pub fn quote(&self) -> Option<&str> {
        self.split().map(|(_, quote)| quote)
    }

    /// Lower-case concatenated form used by v1 query strings (`ethbtc`)
    pub fn v1_name(&self) -> String {
        match self.split() {
            Some((base, quote)) => format!("{}{}", base, quote).to_ascii_lowercase(),
            None => self.0.to_ascii_lowercase(),
        }
    }
}

impl FromStr for Symbol {
    type Err = SymbolParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (base, quote) = s
            .split_once('_')
            .or_else(|| s.split_once('/'))
            .ok_or_else(|| SymbolParseError::MissingSeparator(s.to_string()))?;

        if base.is_empty() || quote.is_empty() {
            return Err(SymbolParseError::EmptyPart(s.to_string()));
        }
        if quote.contains(['_', '/']) {
            return Err(SymbolParseError::InvalidFormat(s.to_string()));
        }

        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Error parsing an instrument name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymbolParseError {
    /// No `_` or `/` separator
    #[error("Symbol must be BASE_QUOTE: {0}")]
    MissingSeparator(String),
    /// More than one separator
    #[error("Invalid symbol format: {0}")]
    InvalidFormat(String),
    /// Base or quote is empty
    #[error("Symbol has an empty base or quote: {0}")]
    EmptyPart(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_parse() {
        let sym: Symbol = "ETH_BTC".parse().unwrap();
        assert_eq!(sym.base(), Some("ETH"));
        assert_eq!(sym.quote(), Some("BTC"));

        let slash: Symbol = "CRO/USDT".parse().unwrap();
        assert_eq!(slash.base(), Some("CRO"));
        assert_eq!(slash.quote(), Some("USDT"));
    }

    #[test]
    fn test_symbol_parse_error() {
        assert!(matches!(
            "ETHBTC".parse::<Symbol>(),
            Err(SymbolParseError::MissingSeparator(_))
        ));
        assert!(matches!(
            "_BTC".parse::<Symbol>(),
            Err(SymbolParseError::EmptyPart(_))
        ));
        assert!(matches!(
            "A_B_C".parse::<Symbol>(),
            Err(SymbolParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_symbol_forms() {
        let sym = Symbol::from_parts("eth", "btc");
        assert_eq!(sym.as_str(), "ETH_BTC");
        assert_eq!(sym.v1_name(), "ethbtc");
    }
}
