//! Nominatim geocoding client
//!
//! Converts location names to coordinates using the
//! [Nominatim](https://nominatim.openstreetmap.org) search API. Requests are
//! spaced at least `min_interval_ms` apart, as required by the Nominatim usage
//! policy.

use std::time::Duration;

use async_trait::async_trait;
use domain::value_objects::GeoLocation;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::config::NominatimConfig;
use crate::error::GeocodingError;

/// Trait for geocoding clients
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Convert a location name to geographic coordinates
    async fn geocode(&self, name: &str) -> Result<GeoLocation, GeocodingError>;
}

/// Nominatim-based geocoding client with request spacing
#[derive(Debug)]
pub struct NominatimGeocodingClient {
    client: Client,
    config: NominatimConfig,
    last_request: Mutex<Option<Instant>>,
}

impl NominatimGeocodingClient {
    /// Create a new Nominatim geocoding client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &NominatimConfig) -> Result<Self, GeocodingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| GeocodingError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
            last_request: Mutex::new(None),
        })
    }

    /// Wait until `min_interval_ms` has passed since the previous request
    async fn rate_limit(&self) {
        let interval = Duration::from_millis(self.config.min_interval_ms);
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < interval {
                let wait = interval.saturating_sub(elapsed);
                debug!(?wait, "Rate limiting geocoding request");
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[async_trait]
impl GeocodingClient for NominatimGeocodingClient {
    #[instrument(skip(self))]
    async fn geocode(&self, name: &str) -> Result<GeoLocation, GeocodingError> {
        if name.trim().is_empty() {
            return Err(GeocodingError::AddressNotFound(
                "Location name must not be empty".to_string(),
            ));
        }

        self.rate_limit().await;

        let query = self.config.query_for(name);
        let url = format!("{}/search", self.config.base_url);
        let mut params = vec![
            ("q", query.clone()),
            ("format", "jsonv2".to_string()),
            ("limit", "1".to_string()),
        ];
        if !self.config.country_filter.is_empty() {
            params.push(("countrycodes", self.config.country_filter.clone()));
        }

        debug!(%query, "Geocoding location");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeocodingError::Timeout
                } else {
                    GeocodingError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodingError::RateLimitExceeded);
        }
        if status.is_server_error() {
            return Err(GeocodingError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(GeocodingError::RequestFailed(format!("HTTP {status}")));
        }

        let results: Vec<NominatimResult> = response
            .json()
            .await
            .map_err(|e| GeocodingError::ParseError(e.to_string()))?;

        let result = results
            .first()
            .ok_or_else(|| GeocodingError::AddressNotFound(query.clone()))?;

        let lat: f64 = result
            .lat
            .parse()
            .map_err(|_| GeocodingError::ParseError("Invalid latitude".to_string()))?;
        let lon: f64 = result
            .lon
            .parse()
            .map_err(|_| GeocodingError::ParseError("Invalid longitude".to_string()))?;

        debug!(%query, %lat, %lon, "Geocoded location");

        GeoLocation::new(lat, lon).map_err(|e| GeocodingError::ParseError(e.to_string()))
    }
}

/// Raw Nominatim search hit; coordinates arrive as strings
#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_parsing() {
        let json = r#"[{"lat": "30.4179", "lon": "-97.9079", "display_name": "Lake Travis"}]"#;
        let results: Vec<NominatimResult> = serde_json::from_str(json).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].lat, "30.4179");
        assert_eq!(results[0].lon, "-97.9079");
    }

    #[test]
    fn empty_result() {
        let results: Vec<NominatimResult> = serde_json::from_str("[]").unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn empty_name_fails_without_request() {
        let client =
            NominatimGeocodingClient::new(&NominatimConfig::for_testing("http://127.0.0.1:9"))
                .unwrap();
        let err = client.geocode("   ").await.unwrap_err();
        assert!(matches!(err, GeocodingError::AddressNotFound(_)));
        assert!(client.last_request.lock().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_spaces_requests() {
        let mut config = NominatimConfig::for_testing("http://127.0.0.1:9");
        config.min_interval_ms = 1000;
        let client = NominatimGeocodingClient::new(&config).unwrap();

        let start = Instant::now();
        client.rate_limit().await;
        client.rate_limit().await;
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }
}
