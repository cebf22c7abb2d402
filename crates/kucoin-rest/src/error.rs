//! Error types for REST API operations

use kucoin_auth::AuthError;
use kucoin_types::error_codes::{KucoinApiError, RecoveryStrategy};

/// Errors that can occur during REST API operations
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// Endpoint path is not host-relative
    #[error("Invalid endpoint path: {0}")]
    InvalidEndpoint(String),

    /// Request could not be signed
    #[error("Signing error: {0}")]
    Signing(String),

    /// Invalid API credentials
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    /// Missing API credentials for private endpoint
    #[error("Authentication required for this endpoint")]
    AuthRequired,

    /// Invalid request parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// No HTTP response (DNS, connect, reset, timeout)
    #[error("Transport error for {url}: {message}")]
    Transport {
        url: String,
        message: String,
        timed_out: bool,
    },

    /// HTTP response with a non-2xx status
    #[error("HTTP {status} from {url}")]
    Http {
        status: u16,
        url: String,
        /// Response body, kept for diagnostics
        body: String,
    },

    /// 2xx response whose `code` is not the success sentinel
    #[error("API error from {url}: {error}")]
    Api {
        /// Parsed error
        error: KucoinApiError,
        url: String,
    },

    /// Failed to parse response
    #[error("Parse error for {url}: {message}")]
    Parse { url: String, message: String },
}

impl From<AuthError> for RestError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidEndpoint(path) => Self::InvalidEndpoint(path),
            AuthError::Signing(msg) => Self::Signing(msg),
            AuthError::InvalidCredentials(msg) => Self::InvalidCredentials(msg),
            AuthError::EnvVarNotSet(name) => Self::EnvVarNotSet(name),
            AuthError::Serialization(msg) => Self::InvalidParameter(msg),
        }
    }
}

impl RestError {
    /// Create an API error from the `code` and `msg` fields of a response
    pub fn api(code: &str, message: &str, url: impl Into<String>) -> Self {
        Self::Api {
            error: KucoinApiError::parse(code, message),
            url: url.into(),
        }
    }

    /// Whether the failure is worth repeating unchanged
    ///
    /// Only transport failures and 5xx responses qualify. API errors are
    /// business outcomes and are never retried automatically.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Get the recovery strategy for this error
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        match self {
            Self::Api { error, .. } => error.recovery_strategy(),
            Self::Transport { .. } => RecoveryStrategy::Retry {
                max_attempts: 3,
                delay_ms: 1000,
            },
            Self::Http { status: 429, .. } => RecoveryStrategy::rate_limit_backoff(),
            Self::Http { status, .. } if *status >= 500 => RecoveryStrategy::service_retry(),
            Self::Http { status: 401 | 403, .. } => RecoveryStrategy::Reauthenticate,
            Self::Http { .. } => RecoveryStrategy::Manual,
            Self::InvalidCredentials(_) | Self::AuthRequired | Self::EnvVarNotSet(_) => {
                RecoveryStrategy::Fatal
            }
            Self::InvalidEndpoint(_)
            | Self::Signing(_)
            | Self::InvalidParameter(_)
            | Self::Parse { .. } => RecoveryStrategy::Fatal,
        }
    }

    /// Check if this error indicates rate limiting
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Http { status: 429, .. })
            || matches!(self, Self::Api { error, .. } if error.is_rate_limit())
    }

    /// The URL the failing request was sent to, when there was one
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Transport { url, .. }
            | Self::Http { url, .. }
            | Self::Api { url, .. }
            | Self::Parse { url, .. } => Some(url),
            _ => None,
        }
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

#[cfg(test)]
mod tests {
    use super::*;
    use kucoin_types::ErrorCategory;

    #[test]
    fn test_parse_api_error() {
        let err = RestError::api("429000", "Too Many Requests", "https://api.kucoin.com/x");
        assert!(err.is_rate_limited());
        assert!(!err.is_transient());
        assert_eq!(err.url(), Some("https://api.kucoin.com/x"));
        match err {
            RestError::Api { error, .. } => assert_eq!(error.category, ErrorCategory::RateLimit),
            other => panic!("expected Api, got {:?}", other),
        }
    }

    #[test]
    fn test_transient_classification() {
        let transport = RestError::Transport {
            url: "u".into(),
            message: "reset".into(),
            timed_out: false,
        };
        assert!(transport.is_transient());

        let server = RestError::Http {
            status: 503,
            url: "u".into(),
            body: String::new(),
        };
        assert!(server.is_transient());

        let client = RestError::Http {
            status: 400,
            url: "u".into(),
            body: String::new(),
        };
        assert!(!client.is_transient());
        assert!(!RestError::AuthRequired.is_transient());
    }

    #[test]
    fn test_recovery_strategies() {
        let rate_limited = RestError::Http {
            status: 429,
            url: "u".into(),
            body: String::new(),
        };
        assert!(rate_limited.recovery_strategy().allows_retry());
        assert!(rate_limited.is_rate_limited());

        assert_eq!(RestError::AuthRequired.recovery_strategy(), RecoveryStrategy::Fatal);
    }

    #[test]
    fn test_from_auth_error() {
        let err: RestError = AuthError::InvalidEndpoint("api/v1".into()).into();
        assert!(matches!(err, RestError::InvalidEndpoint(p) if p == "api/v1"));

        let err: RestError = AuthError::Signing("empty API secret".into()).into();
        assert!(matches!(err, RestError::Signing(_)));
    }
}
