//! Error types for request signing

/// Errors that can occur while building a signed request
///
/// All of these are local precondition failures. None of them is worth
/// retrying: the same inputs produce the same error.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Endpoint path is not host-relative (must start with `/`)
    #[error("Invalid endpoint path: {0}")]
    InvalidEndpoint(String),

    /// HMAC signing precondition failed
    #[error("Signing error: {0}")]
    Signing(String),

    /// Invalid API credentials
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    /// Request body could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for signing operations
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::EnvVarNotSet("KUCOIN_API_KEY".to_string());
        assert!(err.to_string().contains("KUCOIN_API_KEY"));

        let err = AuthError::InvalidEndpoint("api/v1/accounts".to_string());
        assert_eq!(err.to_string(), "Invalid endpoint path: api/v1/accounts");
    }
}
