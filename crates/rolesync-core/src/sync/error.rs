//! Error types for account service operations.

use thiserror::Error;

/// Errors that can occur talking to the billing platform.
#[derive(Error, Debug, Clone)]
pub enum ServiceError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Authorization denied: {0}")]
    AuthorizationDenied(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ServiceError {
    /// Returns the error kind as a static string for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed(_) => "authentication_failed",
            Self::AuthorizationDenied(_) => "authorization_denied",
            Self::ConnectionFailed(_) => "connection_failed",
            Self::RequestFailed(_) => "request_failed",
            Self::NotFound(_) => "not_found",
            Self::InvalidResponse(_) => "invalid_response",
            Self::Timeout(_) => "timeout",
            Self::ConfigError(_) => "config_error",
        }
    }
}

/// Result type for account service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
