//! Client-side request pacing budget
//!
//! The exchange enforces a steady-state request ceiling and punishes bursts
//! that exceed it with HTTP 429. The pacer spaces requests at the normal rate
//! and, after a rejection, spaces the next request at the much slower
//! cooldown rate.

use std::time::Duration;

/// Normal and cooldown request rates, in requests per second
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateBudget {
    /// Rate used when no per-call rate is requested
    pub normal_rps: f64,
    /// Rate used for the single request following a rate-limit rejection
    pub cooldown_rps: f64,
}

impl Default for RateBudget {
    fn default() -> Self {
        Self::defaults()
    }
}

impl RateBudget {
    /// Create a budget from explicit rates
    pub const fn new(normal_rps: f64, cooldown_rps: f64) -> Self {
        Self {
            normal_rps,
            cooldown_rps,
        }
    }

    /// Exchange defaults: 100 req/s normally, one request per minute in cooldown
    pub const fn defaults() -> Self {
        Self::new(100.0, 1.0 / 60.0)
    }

    /// Very permissive budget (for testing)
    pub const fn permissive() -> Self {
        Self::new(1_000_000.0, 1_000.0)
    }

    /// Minimum spacing between requests at the normal rate
    pub fn normal_interval(&self) -> Duration {
        min_interval(self.normal_rps)
    }

    /// Minimum spacing between requests at the cooldown rate
    pub fn cooldown_interval(&self) -> Duration {
        min_interval(self.cooldown_rps)
    }
}

/// Minimum spacing between two requests at `rps` requests per second
///
/// Non-positive or non-finite rates impose no spacing.
pub fn min_interval(rps: f64) -> Duration {
    if rps.is_finite() && rps > 0.0 {
        Duration::from_secs_f64(1.0 / rps)
    } else {
        Duration::ZERO
    }
}

/// Per-endpoint rates published by the exchange (requests per second)
pub mod endpoint_rates {
    /// `get-account-summary`, `get-open-orders` and v1 account queries
    pub const ACCOUNT: f64 = 30.0;
    /// `create-order`
    pub const CREATE_ORDER: f64 = 150.0;
    /// `cancel-order`
    pub const CANCEL_ORDER: f64 = 150.0;
    /// `get-order-detail`
    pub const ORDER_DETAIL: f64 = 300.0;
    /// `get-open-orders`
    pub const OPEN_ORDERS: f64 = 30.0;
    /// `get-trades`
    pub const TRADES: f64 = 1.0;
}
