//! KuCoin API error code mapping with recovery strategies
//!
//! Every KuCoin response carries a `code` field. `"200000"` means success,
//! anything else is an application-level failure described by `msg`. This
//! module maps the documented codes onto a typed enum, a coarse category and
//! a recovery hint for callers.

use std::time::Duration;

/// Success sentinel carried in the `code` field of every successful response
pub const SUCCESS_CODE: &str = "200000";

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
    /// Fix the credentials or the signing clock and re-send
    Reauthenticate,
    /// Cannot recover programmatically - fatal error
    Fatal,
    /// Requires user intervention (e.g., add funds)
    UserAction { message: &'static str },
    /// Drop this request and continue
    Skip,
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
        matches!(
            self,
            Self::Backoff { .. } | Self::Retry { .. } | Self::Reauthenticate
        )
    }
}

/// KuCoin error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// 4000xx: missing or invalid authentication headers
    Auth,
    /// Malformed request, bad parameters, unknown route
    Request,
    /// 429000: request rate exceeded
    RateLimit,
    /// Account state prevents the operation (balance, frozen user)
    Account,
    /// Order or symbol rejected by the trading engine
    Trading,
    /// 5xxxxx: server-side failure
    Service,
    /// Code not in the known table
    Unknown,
}

/// Parsed KuCoin API error with metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KucoinApiError {
    /// The raw `code` field from the response
    pub raw_code: String,
    /// Recognised error code
    pub code: Option<KucoinErrorCode>,
    /// Error category
    pub category: ErrorCategory,
    /// The `msg` field from the response
    pub message: String,
}

impl KucoinApiError {
    /// Build a structured error from the `code` and `msg` fields of a response
    pub fn parse(code: &str, message: &str) -> Self {
        let known = KucoinErrorCode::from_code(code);
        let category = match known {
            Some(c) => c.category(),
            None => Self::category_from_prefix(code),
        };

        Self {
            raw_code: code.to_string(),
            code: known,
            category,
            message: message.to_string(),
        }
    }

    // Unknown codes still follow the documented numbering scheme
    fn category_from_prefix(code: &str) -> ErrorCategory {
        if code.starts_with("4000") {
            ErrorCategory::Auth
        } else if code.starts_with("429") {
            ErrorCategory::RateLimit
        } else if code.starts_with('5') {
            ErrorCategory::Service
        } else if code.starts_with('4') {
            ErrorCategory::Request
        } else {
            ErrorCategory::Unknown
        }
    }

    /// Get the recovery strategy for this error
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        match self.code {
            Some(code) => code.recovery_strategy(),
            None => match self.category {
                ErrorCategory::RateLimit => RecoveryStrategy::rate_limit_backoff(),
                ErrorCategory::Service => RecoveryStrategy::service_retry(),
                _ => RecoveryStrategy::Manual,
            },
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        self.recovery_strategy().allows_retry()
    }

    /// Check if this error requires fixing the credentials
    pub fn requires_reauth(&self) -> bool {
        matches!(self.recovery_strategy(), RecoveryStrategy::Reauthenticate)
    }

    /// Check if this is a rate limit error
    pub fn is_rate_limit(&self) -> bool {
        self.category == ErrorCategory::RateLimit
    }

    /// Check if this is a fatal error that cannot be recovered
    pub fn is_fatal(&self) -> bool {
        matches!(self.recovery_strategy(), RecoveryStrategy::Fatal)
    }
}

impl std::fmt::Display for KucoinApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.raw_code)
    }
}

/// Documented KuCoin API error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KucoinErrorCode {
    /// 400001: an authentication header is missing
    MissingAuthHeader,
    /// 400002: KC-API-TIMESTAMP outside the accepted window
    InvalidTimestamp,
    /// 400003: KC-API-KEY not found
    ApiKeyNotFound,
    /// 400004: KC-API-PASSPHRASE mismatch
    InvalidPassphrase,
    /// 400005: KC-API-SIGN mismatch
    InvalidSignature,
    /// 400006: caller IP not whitelisted for this key
    IpNotWhitelisted,
    /// 400007: key lacks the permission for this route
    AccessDenied,
    /// 404000: unknown route
    UrlNotFound,
    /// 400100: invalid or missing parameter
    InvalidParameter,
    /// 400200: ordering forbidden for this account
    OrderForbidden,
    /// 400500: region not supported
    RegionNotSupported,
    /// 400600: validation failed
    ValidationError,
    /// 400760: no price available for a market order
    NoPriceAvailable,
    /// 411100: user is frozen
    UserFrozen,
    /// 415000: unsupported media type
    UnsupportedMediaType,
    /// 429000: too many requests
    TooManyRequests,
    /// 200004: insufficient balance
    InsufficientBalance,
    /// 230003: insufficient balance in the margin account
    InsufficientMarginBalance,
    /// 900001: symbol does not exist
    SymbolNotExists,
    /// 500000: internal server error
    InternalError,
    /// 503000: service unavailable
    ServiceUnavailable,
}

impl KucoinErrorCode {
    /// Look up a documented code
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "400001" => Self::MissingAuthHeader,
            "400002" => Self::InvalidTimestamp,
            "400003" => Self::ApiKeyNotFound,
            "400004" => Self::InvalidPassphrase,
            "400005" => Self::InvalidSignature,
            "400006" => Self::IpNotWhitelisted,
            "400007" => Self::AccessDenied,
            "404000" => Self::UrlNotFound,
            "400100" => Self::InvalidParameter,
            "400200" => Self::OrderForbidden,
            "400500" => Self::RegionNotSupported,
            "400600" => Self::ValidationError,
            "400760" => Self::NoPriceAvailable,
            "411100" => Self::UserFrozen,
            "415000" => Self::UnsupportedMediaType,
            "429000" => Self::TooManyRequests,
            "200004" => Self::InsufficientBalance,
            "230003" => Self::InsufficientMarginBalance,
            "900001" => Self::SymbolNotExists,
            "500000" => Self::InternalError,
            "503000" => Self::ServiceUnavailable,
            _ => return None,
        })
    }

    /// The numeric code as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingAuthHeader => "400001",
            Self::InvalidTimestamp => "400002",
            Self::ApiKeyNotFound => "400003",
            Self::InvalidPassphrase => "400004",
            Self::InvalidSignature => "400005",
            Self::IpNotWhitelisted => "400006",
            Self::AccessDenied => "400007",
            Self::UrlNotFound => "404000",
            Self::InvalidParameter => "400100",
            Self::OrderForbidden => "400200",
            Self::RegionNotSupported => "400500",
            Self::ValidationError => "400600",
            Self::NoPriceAvailable => "400760",
            Self::UserFrozen => "411100",
            Self::UnsupportedMediaType => "415000",
            Self::TooManyRequests => "429000",
            Self::InsufficientBalance => "200004",
            Self::InsufficientMarginBalance => "230003",
            Self::SymbolNotExists => "900001",
            Self::InternalError => "500000",
            Self::ServiceUnavailable => "503000",
        }
    }

    /// Get the category of this code
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingAuthHeader
            | Self::InvalidTimestamp
            | Self::ApiKeyNotFound
            | Self::InvalidPassphrase
            | Self::InvalidSignature
            | Self::IpNotWhitelisted
            | Self::AccessDenied => ErrorCategory::Auth,
            Self::UrlNotFound
            | Self::InvalidParameter
            | Self::ValidationError
            | Self::UnsupportedMediaType => ErrorCategory::Request,
            Self::TooManyRequests => ErrorCategory::RateLimit,
            Self::RegionNotSupported
            | Self::UserFrozen
            | Self::InsufficientBalance
            | Self::InsufficientMarginBalance => ErrorCategory::Account,
            Self::OrderForbidden | Self::NoPriceAvailable | Self::SymbolNotExists => {
                ErrorCategory::Trading
            }
            Self::InternalError | Self::ServiceUnavailable => ErrorCategory::Service,
        }
    }

    /// Get the recovery strategy for this error code
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        match self {
            Self::TooManyRequests => RecoveryStrategy::rate_limit_backoff(),

            // A skewed clock shows up as a timestamp rejection
            Self::InvalidTimestamp | Self::InvalidSignature | Self::MissingAuthHeader => {
                RecoveryStrategy::Reauthenticate
            }
            Self::ApiKeyNotFound | Self::InvalidPassphrase => RecoveryStrategy::Fatal,
            Self::IpNotWhitelisted | Self::AccessDenied => RecoveryStrategy::Fatal,

            Self::InternalError | Self::ServiceUnavailable => RecoveryStrategy::service_retry(),

            Self::InsufficientBalance | Self::InsufficientMarginBalance => {
                RecoveryStrategy::UserAction {
                    message: "Insufficient balance - deposit more or reduce order size",
                }
            }
            Self::UserFrozen => RecoveryStrategy::UserAction {
                message: "Account is frozen - contact support",
            },
            Self::RegionNotSupported => RecoveryStrategy::Fatal,
            Self::OrderForbidden => RecoveryStrategy::UserAction {
                message: "Ordering is disabled for this account or symbol",
            },

            Self::UrlNotFound
            | Self::InvalidParameter
            | Self::ValidationError
            | Self::UnsupportedMediaType
            | Self::NoPriceAvailable
            | Self::SymbolNotExists => RecoveryStrategy::Skip,
        }
    }

    /// Get a human-readable description of this error
    pub fn description(&self) -> &'static str {
        match self {
            Self::MissingAuthHeader => "Authentication header missing",
            Self::InvalidTimestamp => "Request timestamp rejected",
            Self::ApiKeyNotFound => "API key not found",
            Self::InvalidPassphrase => "API passphrase is wrong",
            Self::InvalidSignature => "Invalid request signature",
            Self::IpNotWhitelisted => "IP address not in API key whitelist",
            Self::AccessDenied => "API key lacks permission for this endpoint",
            Self::UrlNotFound => "Endpoint not found",
            Self::InvalidParameter => "Invalid parameter",
            Self::OrderForbidden => "Order placement forbidden",
            Self::RegionNotSupported => "Region not supported",
            Self::ValidationError => "Request validation failed",
            Self::NoPriceAvailable => "No price available",
            Self::UserFrozen => "User is frozen",
            Self::UnsupportedMediaType => "Unsupported media type",
            Self::TooManyRequests => "Too many requests",
            Self::InsufficientBalance => "Insufficient balance",
            Self::InsufficientMarginBalance => "Insufficient margin balance",
            Self::SymbolNotExists => "Symbol does not exist",
            Self::InternalError => "Internal server error",
            Self::ServiceUnavailable => "Service unavailable",
        }
    }

    /// Check if this is an authentication-related error
    pub fn is_auth_error(&self) -> bool {
        self.category() == ErrorCategory::Auth
    }
}
