//! Exchange error code mapping with recovery strategies
//!
//! v2 responses carry a numeric `code`; this module maps the documented codes
//! to structured variants so callers can decide how to react.

use std::time::Duration;

/// Recovery strategy for handling API errors
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RecoveryStrategy {
    /// Exponential backoff before retry
    Backoff {
        initial_ms: u64,
        max_ms: u64,
        multiplier: u32,
    },
    /// Fixed delay retry
    Retry { delay_ms: u64, max_attempts: u32 },
    /// Cannot recover programmatically
    Fatal,
    /// Requires user intervention (e.g., add funds)
    UserAction { message: &'static str },
    /// Manual investigation needed
    #[default]
    Manual,
}

impl RecoveryStrategy {
    /// Default exponential backoff for rate limits
    pub fn rate_limit_backoff() -> Self {
        Self::Backoff {
            initial_ms: 1000,
            max_ms: 60000,
            multiplier: 2,
        }
    }

    /// Default retry for transient service errors
    pub fn service_retry() -> Self {
        Self::Retry {
            delay_ms: 1000,
            max_attempts: 3,
        }
    }

    /// Get the initial delay duration
    pub fn initial_delay(&self) -> Option<Duration> {
        match self {
            Self::Backoff { initial_ms, .. } => Some(Duration::from_millis(*initial_ms)),
            Self::Retry { delay_ms, .. } => Some(Duration::from_millis(*delay_ms)),
            _ => None,
        }
    }

    /// Check if this strategy allows retry
    pub fn allows_retry(&self) -> bool {
        matches!(self, Self::Backoff { .. } | Self::Retry { .. })
    }
}

/// Exchange error categories, following the leading digits of the code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// 100xx - system, authentication and request errors
    System,
    /// 200xx - account state errors
    Account,
    /// 300xx - order validation errors
    Order,
    /// 400xx - margin errors
    Margin,
    /// Unknown code
    Unknown,
}

/// Known exchange error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExchangeErrorCode {
    /// 10001 SYS_ERROR
    SysError,
    /// 10002 UNAUTHORIZED
    Unauthorized,
    /// 10003 IP_ILLEGAL
    IpIllegal,
    /// 10004 BAD_REQUEST
    BadRequest,
    /// 10005 USER_TIER_INVALID
    UserTierInvalid,
    /// 10006 TOO_MANY_REQUESTS
    TooManyRequests,
    /// 10007 INVALID_NONCE
    InvalidNonce,
    /// 10008 METHOD_NOT_FOUND
    MethodNotFound,
    /// 10009 INVALID_DATE_RANGE
    InvalidDateRange,
    /// 20001 DUPLICATE_RECORD
    DuplicateRecord,
    /// 20002 NEGATIVE_BALANCE
    NegativeBalance,
    /// 30003 SYMBOL_NOT_FOUND
    SymbolNotFound,
    /// 30004 SIDE_NOT_SUPPORTED
    SideNotSupported,
    /// 30005 ORDERTYPE_NOT_SUPPORTED
    OrderTypeNotSupported,
    /// 30006 MIN_PRICE_VIOLATED
    MinPriceViolated,
    /// 30007 MAX_PRICE_VIOLATED
    MaxPriceViolated,
    /// 30008 MIN_QUANTITY_VIOLATED
    MinQuantityViolated,
    /// 30009 MAX_QUANTITY_VIOLATED
    MaxQuantityViolated,
    /// 30010 MISSING_ARGUMENT
    MissingArgument,
    /// 30013 INVALID_PRICE_PRECISION
    InvalidPricePrecision,
    /// 30014 INVALID_QUANTITY_PRECISION
    InvalidQuantityPrecision,
    /// 30016 MIN_NOTIONAL_VIOLATED
    MinNotionalViolated,
    /// 30017 MAX_NOTIONAL_VIOLATED
    MaxNotionalViolated,
    /// 40006 MG_BLOCKED_BORROW
    MarginBlockedBorrow,
    /// 40007 MG_BLOCKED_NEW_ORDER
    MarginBlockedNewOrder,
}

impl ExchangeErrorCode {
    /// Map a numeric code
    pub fn from_code(code: i64) -> Option<Self> {
        let parsed = match code {
            10001 => Self::SysError,
            10002 => Self::Unauthorized,
            10003 => Self::IpIllegal,
            10004 => Self::BadRequest,
            10005 => Self::UserTierInvalid,
            10006 => Self::TooManyRequests,
            10007 => Self::InvalidNonce,
            10008 => Self::MethodNotFound,
            10009 => Self::InvalidDateRange,
            20001 => Self::DuplicateRecord,
            20002 => Self::NegativeBalance,
            30003 => Self::SymbolNotFound,
            30004 => Self::SideNotSupported,
            30005 => Self::OrderTypeNotSupported,
            30006 => Self::MinPriceViolated,
            30007 => Self::MaxPriceViolated,
            30008 => Self::MinQuantityViolated,
            30009 => Self::MaxQuantityViolated,
            30010 => Self::MissingArgument,
            30013 => Self::InvalidPricePrecision,
            30014 => Self::InvalidQuantityPrecision,
            30016 => Self::MinNotionalViolated,
            30017 => Self::MaxNotionalViolated,
            40006 => Self::MarginBlockedBorrow,
            40007 => Self::MarginBlockedNewOrder,
            _ => return None,
        };
        Some(parsed)
    }

    /// Documented name of the code
    pub fn name(&self) -> &'static str {
        match self {
            Self::SysError => "SYS_ERROR",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::IpIllegal => "IP_ILLEGAL",
            Self::BadRequest => "BAD_REQUEST",
            Self::UserTierInvalid => "USER_TIER_INVALID",
            Self::TooManyRequests => "TOO_MANY_REQUESTS",
            Self::InvalidNonce => "INVALID_NONCE",
            Self::MethodNotFound => "METHOD_NOT_FOUND",
            Self::InvalidDateRange => "INVALID_DATE_RANGE",
            Self::DuplicateRecord => "DUPLICATE_RECORD",
            Self::NegativeBalance => "NEGATIVE_BALANCE",
            Self::SymbolNotFound => "SYMBOL_NOT_FOUND",
            Self::SideNotSupported => "SIDE_NOT_SUPPORTED",
            Self::OrderTypeNotSupported => "ORDERTYPE_NOT_SUPPORTED",
            Self::MinPriceViolated => "MIN_PRICE_VIOLATED",
            Self::MaxPriceViolated => "MAX_PRICE_VIOLATED",
            Self::MinQuantityViolated => "MIN_QUANTITY_VIOLATED",
            Self::MaxQuantityViolated => "MAX_QUANTITY_VIOLATED",
            Self::MissingArgument => "MISSING_ARGUMENT",
            Self::InvalidPricePrecision => "INVALID_PRICE_PRECISION",
            Self::InvalidQuantityPrecision => "INVALID_QUANTITY_PRECISION",
            Self::MinNotionalViolated => "MIN_NOTIONAL_VIOLATED",
            Self::MaxNotionalViolated => "MAX_NOTIONAL_VIOLATED",
            Self::MarginBlockedBorrow => "MG_BLOCKED_BORROW",
            Self::MarginBlockedNewOrder => "MG_BLOCKED_NEW_ORDER",
        }
    }

    /// Recovery strategy for this code
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        match self {
            Self::SysError => RecoveryStrategy::service_retry(),
            Self::TooManyRequests => RecoveryStrategy::rate_limit_backoff(),
            // A fresh nonce is generated on every attempt
            Self::InvalidNonce => RecoveryStrategy::Retry {
                delay_ms: 0,
                max_attempts: 1,
            },
            Self::Unauthorized | Self::IpIllegal | Self::UserTierInvalid => RecoveryStrategy::Fatal,
            Self::NegativeBalance => RecoveryStrategy::UserAction {
                message: "Insufficient balance for this operation",
            },
            Self::MarginBlockedBorrow | Self::MarginBlockedNewOrder => RecoveryStrategy::UserAction {
                message: "Margin account is restricted",
            },
            Self::DuplicateRecord => RecoveryStrategy::Manual,
            _ => RecoveryStrategy::Fatal,
        }
    }
}

impl ErrorCategory {
    /// Category of a numeric code
    pub fn from_code(code: i64) -> Self {
        match code {
            10000..=19999 => Self::System,
            20000..=29999 => Self::Account,
            30000..=39999 => Self::Order,
            40000..=49999 => Self::Margin,
            _ => Self::Unknown,
        }
    }
}

/// Parsed exchange error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeApiError {
    /// Raw numeric code (0 when the response carried a non-numeric code)
    pub code: i64,
    /// Recognized code, if any
    pub known: Option<ExchangeErrorCode>,
    /// Category derived from the code
    pub category: ErrorCategory,
    /// Message reported by the exchange
    pub message: String,
}

impl ExchangeApiError {
    /// Build from a code and message
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            known: ExchangeErrorCode::from_code(code),
            category: ErrorCategory::from_code(code),
            message: message.into(),
        }
    }

    /// Get the recovery strategy for this error
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        self.known
            .map(|c| c.recovery_strategy())
            .unwrap_or(RecoveryStrategy::Manual)
    }

    /// Check if this is a rate limit error
    pub fn is_rate_limit(&self) -> bool {
        self.known == Some(ExchangeErrorCode::TooManyRequests)
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        self.recovery_strategy().allows_retry()
    }
}
