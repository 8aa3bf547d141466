//! Error types for authentication operations

/// Errors that can occur while building credentials or signed requests
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Invalid API credentials
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    /// Parameters could not be encoded
    #[error("Failed to encode parameters: {0}")]
    Encode(String),
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::EnvVarNotSet("CDC_API_KEY".to_string());
        assert!(err.to_string().contains("CDC_API_KEY"));
    }
}
