//! Weather client errors

use thiserror::Error;

/// Errors raised by the archive and ASOS clients
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Connection to the weather service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the weather service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from weather service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid coordinates provided
    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Request timeout
    #[error("Request timed out")]
    Timeout,
}

impl WeatherError {
    /// Returns true if a later attempt may succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::ServiceUnavailable(_)
                | Self::RateLimitExceeded
                | Self::Timeout
        )
    }

    pub(crate) fn from_send(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::ConnectionFailed(error.to_string())
        }
    }

    /// Map a non-success HTTP status
    pub(crate) fn from_status(status: reqwest::StatusCode) -> Self {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            Self::RateLimitExceeded
        } else if status.is_server_error() {
            Self::ServiceUnavailable(format!("HTTP {status}"))
        } else {
            Self::RequestFailed(format!("HTTP {status}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn status_mapping() {
        assert!(matches!(
            WeatherError::from_status(StatusCode::TOO_MANY_REQUESTS),
            WeatherError::RateLimitExceeded
        ));
        assert!(matches!(
            WeatherError::from_status(StatusCode::BAD_GATEWAY),
            WeatherError::ServiceUnavailable(_)
        ));
        assert!(matches!(
            WeatherError::from_status(StatusCode::BAD_REQUEST),
            WeatherError::RequestFailed(_)
        ));
    }

    #[test]
    fn retryable_classification() {
        assert!(WeatherError::Timeout.is_retryable());
        assert!(WeatherError::RateLimitExceeded.is_retryable());
        assert!(WeatherError::ServiceUnavailable("HTTP 503".into()).is_retryable());
        assert!(!WeatherError::ParseError("bad".into()).is_retryable());
        assert!(!WeatherError::InvalidCoordinates.is_retryable());
        assert!(!WeatherError::RequestFailed("HTTP 400".into()).is_retryable());
    }
}
