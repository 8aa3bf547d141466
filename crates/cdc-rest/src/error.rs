//! Error types for REST API operations

use cdc_auth::AuthError;
use cdc_types::error_codes::{ExchangeApiError, RecoveryStrategy};

use crate::transport::{HttpMethod, TransportError};

/// Errors that can occur during REST API operations
///
/// `target` fields hold the request path, followed by the query string for
/// GET requests, so the failing call can be reproduced from the message.
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// Network or connection failure
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Non-2xx HTTP status without an application error in the body
    #[error("{method} {target} {status}")]
    HttpStatus {
        /// Request method
        method: HttpMethod,
        /// Path and query
        target: String,
        /// HTTP status code
        status: u16,
    },

    /// The exchange reported an application error
    #[error("{method} {target} {}", .error.message)]
    Api {
        /// Request method
        method: HttpMethod,
        /// Path and query
        target: String,
        /// Parsed error
        error: ExchangeApiError,
    },

    /// Failed to parse response
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Missing API credentials for private endpoint
    #[error("Authentication required for this endpoint")]
    AuthRequired,

    /// Credential or signing failure
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Lookup returned nothing
    #[error("{0} does not exist")]
    NotFound(String),

    /// Order was accepted but then rejected by the matching engine
    #[error("order rejected. reason: {reason}")]
    OrderRejected {
        /// Exchange order id
        order_id: String,
        /// Rejection reason reported by the exchange
        reason: String,
    },

    /// Order expired right after placement, usually for lack of funds
    #[error("{message}")]
    OrderExpired {
        /// Exchange order id
        order_id: String,
        /// Diagnostic including side, quantity, instrument and balance
        message: String,
    },

    /// A pacer hook aborted the request instead of waiting
    #[error("{method} {path} vetoed: {reason}")]
    Vetoed {
        /// Request method
        method: HttpMethod,
        /// Request path
        path: String,
        /// Reason given by the hook
        reason: String,
    },

    /// Rate-limit rejections exceeded the configured retry ceiling
    #[error("{method} {path} still rate limited after {attempts} attempts")]
    RateLimitRetriesExhausted {
        /// Request method
        method: HttpMethod,
        /// Request path
        path: String,
        /// Number of attempts made
        attempts: u32,
    },

    /// Invalid request parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl RestError {
    /// Order id attached to a post-placement failure
    pub fn order_id(&self) -> Option<&str> {
        match self {
            Self::OrderRejected { order_id, .. } | Self::OrderExpired { order_id, .. } => {
                Some(order_id)
            }
            _ => None,
        }
    }

    /// Get the recovery strategy for this error
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        match self {
            Self::Api { error, .. } => error.recovery_strategy(),
            Self::RateLimitRetriesExhausted { .. } => RecoveryStrategy::rate_limit_backoff(),
            Self::HttpStatus { status: 429, .. } => RecoveryStrategy::rate_limit_backoff(),
            Self::HttpStatus { status, .. } if *status >= 500 => RecoveryStrategy::service_retry(),
            Self::Transport(_) => RecoveryStrategy::Retry {
                max_attempts: 3,
                delay_ms: 1000,
            },
            Self::OrderExpired { .. } => RecoveryStrategy::UserAction {
                message: "Check the available balance before placing the order again",
            },
            Self::OrderRejected { .. } | Self::Vetoed { .. } => RecoveryStrategy::Manual,
            Self::HttpStatus { .. }
            | Self::Decode(_)
            | Self::AuthRequired
            | Self::Auth(_)
            | Self::NotFound(_)
            | Self::InvalidParameter(_) => RecoveryStrategy::Fatal,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        self.recovery_strategy().allows_retry()
    }

    /// Check if this error indicates rate limiting
    pub fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            Self::RateLimitRetriesExhausted { .. } | Self::HttpStatus { status: 429, .. }
        ) || matches!(self, Self::Api { error, .. } if error.is_rate_limit())
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;
