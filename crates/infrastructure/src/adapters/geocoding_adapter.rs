//! Geocoding adapter - Implements GeocodingPort using integration_geocoding

use application::error::ApplicationError;
use application::ports::GeocodingPort;
use async_trait::async_trait;
use domain::value_objects::GeoLocation;
use integration_geocoding::{
    GeocodingClient, GeocodingError, NominatimConfig, NominatimGeocodingClient,
};
use tracing::{debug, instrument};

use crate::retry::{RetryConfig, with_retry};

/// Adapter for Nominatim geocoding with retries on transient failures
pub struct GeocodingAdapter {
    client: NominatimGeocodingClient,
    retry: RetryConfig,
}

impl std::fmt::Debug for GeocodingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingAdapter")
            .field("client", &"NominatimGeocodingClient")
            .field("max_retries", &self.retry.max_retries)
            .finish()
    }
}

impl GeocodingAdapter {
    /// Create an adapter for the given Nominatim configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: &NominatimConfig, retry: RetryConfig) -> Result<Self, ApplicationError> {
        let client = NominatimGeocodingClient::new(config)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self { client, retry })
    }

    /// Map integration geocoding error to application error
    fn map_error(err: GeocodingError) -> ApplicationError {
        match err {
            GeocodingError::AddressNotFound(query) => ApplicationError::NotFound(query),
            GeocodingError::RateLimitExceeded => ApplicationError::RateLimited,
            GeocodingError::ConnectionFailed(e)
            | GeocodingError::RequestFailed(e)
            | GeocodingError::ServiceUnavailable(e) => ApplicationError::ExternalService(e),
            GeocodingError::ParseError(e) => {
                ApplicationError::ExternalService(format!("Invalid geocoding response: {e}"))
            },
            GeocodingError::Timeout => {
                ApplicationError::ExternalService("Geocoding request timed out".into())
            },
        }
    }
}

#[async_trait]
impl GeocodingPort for GeocodingAdapter {
    #[instrument(skip(self))]
    async fn geocode(&self, name: &str) -> Result<GeoLocation, ApplicationError> {
        let outcome = with_retry(&self.retry, || self.client.geocode(name)).await;
        debug!(attempts = outcome.attempts, ok = outcome.is_ok(), "Geocoding finished");
        outcome.into_result().map_err(Self::map_error)
    }
}
