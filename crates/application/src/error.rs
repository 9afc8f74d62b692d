//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The external service answered but had no result for the query
    #[error("Not found: {0}")]
    NotFound(String),

    /// External service error (connection, timeout, server error)
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Reading or writing a cache snapshot failed
    #[error("Cache storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::ExternalService(_)
        )
    }

    /// Whether this error means "the service has no answer" rather than "the call failed"
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_errors() {
        assert!(ApplicationError::RateLimited.is_retryable());
        assert!(ApplicationError::ExternalService("timeout".into()).is_retryable());
    }

    #[test]
    fn non_retryable_errors() {
        assert!(!ApplicationError::NotFound("Atlantis".into()).is_retryable());
        assert!(!ApplicationError::Storage("disk full".into()).is_retryable());
        assert!(!ApplicationError::Domain(DomainError::InvalidDate("x".into())).is_retryable());
    }

    #[test]
    fn not_found_detection() {
        assert!(ApplicationError::NotFound("Atlantis".into()).is_not_found());
        assert!(!ApplicationError::RateLimited.is_not_found());
    }

    #[test]
    fn domain_errors_are_transparent() {
        let err: ApplicationError = DomainError::insufficient_data(3, 13).into();
        assert_eq!(
            err.to_string(),
            "Insufficient hourly data: 3 samples, need at least 13"
        );
    }
}
