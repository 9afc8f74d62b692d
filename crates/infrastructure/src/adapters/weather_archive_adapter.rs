//! Weather archive adapter - Implements WeatherArchivePort using integration_weather

use application::error::ApplicationError;
use application::ports::WeatherArchivePort;
use async_trait::async_trait;
use domain::value_objects::{HourlySample, WeatherKey};
use integration_weather::{ArchiveClient, ArchiveConfig, OpenMeteoArchiveClient, WeatherError};
use tracing::{debug, instrument};

use crate::retry::{RetryConfig, with_retry};

/// Adapter for the Open-Meteo archive with retries on transient failures
pub struct WeatherArchiveAdapter {
    client: OpenMeteoArchiveClient,
    retry: RetryConfig,
}

impl std::fmt::Debug for WeatherArchiveAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherArchiveAdapter")
            .field("client", &"OpenMeteoArchiveClient")
            .field("max_retries", &self.retry.max_retries)
            .finish()
    }
}

impl WeatherArchiveAdapter {
    /// Create with custom configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: ArchiveConfig, retry: RetryConfig) -> Result<Self, ApplicationError> {
        let client = OpenMeteoArchiveClient::new(config)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self { client, retry })
    }

    /// Map integration weather error to application error
    fn map_error(err: WeatherError) -> ApplicationError {
        match err {
            WeatherError::ConnectionFailed(e)
            | WeatherError::RequestFailed(e)
            | WeatherError::ServiceUnavailable(e) => ApplicationError::ExternalService(e),
            WeatherError::ParseError(e) => {
                ApplicationError::ExternalService(format!("Invalid archive response: {e}"))
            },
            WeatherError::Timeout => {
                ApplicationError::ExternalService("Archive request timed out".into())
            },
            WeatherError::RateLimitExceeded => ApplicationError::RateLimited,
            WeatherError::InvalidCoordinates => ApplicationError::Domain(
                domain::DomainError::InvalidCoordinates("rejected by archive client".into()),
            ),
            WeatherError::InvalidRequest(e) => ApplicationError::Internal(e),
        }
    }
}

#[async_trait]
impl WeatherArchivePort for WeatherArchiveAdapter {
    #[instrument(skip(self, key), fields(key = %key))]
    async fn hourly_weather(&self, key: &WeatherKey) -> Result<Vec<HourlySample>, ApplicationError> {
        let outcome = with_retry(&self.retry, || {
            self.client.hourly(key.latitude(), key.longitude(), key.date())
        })
        .await;
        debug!(attempts = outcome.attempts, ok = outcome.is_ok(), "Archive request finished");
        outcome.into_result().map_err(Self::map_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_maps_to_rate_limited() {
        assert!(matches!(
            WeatherArchiveAdapter::map_error(WeatherError::RateLimitExceeded),
            ApplicationError::RateLimited
        ));
    }

    #[test]
    fn http_failures_map_to_external_service() {
        assert!(matches!(
            WeatherArchiveAdapter::map_error(WeatherError::ServiceUnavailable("HTTP 502".into())),
            ApplicationError::ExternalService(_)
        ));
        assert!(matches!(
            WeatherArchiveAdapter::map_error(WeatherError::Timeout),
            ApplicationError::ExternalService(_)
        ));
    }

    #[test]
    fn invalid_coordinates_map_to_domain() {
        assert!(matches!(
            WeatherArchiveAdapter::map_error(WeatherError::InvalidCoordinates),
            ApplicationError::Domain(_)
        ));
    }
}
