//! Shared types for the Crypto.com Exchange REST bindings
//!
//! This crate provides the core type definitions used across the workspace.
//! It has minimal dependencies and can be used independently.
//!
//! # Key Types
//!
//! - [`Symbol`] - Instrument names (e.g., "ETH_BTC")
//! - [`OrderSide`], [`OrderType`], [`OrderStatus`] - Trading enums with wire mappings
//! - [`RateBudget`] - Normal and cooldown request rates for the pacer
//! - [`ExchangeApiError`], [`ExchangeErrorCode`] - Exchange error mapping with recovery strategies

pub mod enums;
pub mod error_codes;
pub mod rate_limit;
pub mod symbol;

// Re-export commonly used types
pub use enums::*;
pub use error_codes::*;
pub use rate_limit::*;
pub use symbol::*;

// Re-export rust_decimal for users
pub use rust_decimal::Decimal;
