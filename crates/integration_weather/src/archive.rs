//! Open-Meteo historical weather client
//!
//! HTTP client for the Open-Meteo archive API
//! (<https://open-meteo.com/en/docs/historical-weather-api>). Each request asks
//! for a single day of hourly data at one coordinate pair.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use domain::value_objects::HourlySample;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::error::WeatherError;
use crate::models::{ArchiveResponse, HOURLY_VARIABLES};

/// Archive service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Archive API base URL (default: <https://archive-api.open-meteo.com/v1>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// `temperature_unit` parameter (default: fahrenheit)
    #[serde(default = "default_temperature_unit")]
    pub temperature_unit: String,

    /// `wind_speed_unit` parameter (default: mph)
    #[serde(default = "default_wind_speed_unit")]
    pub wind_speed_unit: String,

    /// `precipitation_unit` parameter (default: inch)
    #[serde(default = "default_precipitation_unit")]
    pub precipitation_unit: String,

    /// Timezone the hourly series is expressed in (default: America/Chicago)
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Minimum spacing between requests in milliseconds (default: 100)
    #[serde(default = "default_request_interval_ms")]
    pub request_interval_ms: u64,
}

fn default_base_url() -> String {
    "https://archive-api.open-meteo.com/v1".to_string()
}

const fn default_timeout() -> u64 {
    30
}

fn default_temperature_unit() -> String {
    "fahrenheit".to_string()
}

fn default_wind_speed_unit() -> String {
    "mph".to_string()
}

fn default_precipitation_unit() -> String {
    "inch".to_string()
}

fn default_timezone() -> String {
    "America/Chicago".to_string()
}

const fn default_request_interval_ms() -> u64 {
    100
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            temperature_unit: default_temperature_unit(),
            wind_speed_unit: default_wind_speed_unit(),
            precipitation_unit: default_precipitation_unit(),
            timezone: default_timezone(),
            request_interval_ms: default_request_interval_ms(),
        }
    }
}

/// Client trait for historical hourly weather
#[async_trait]
pub trait ArchiveClient: Send + Sync {
    /// Fetch the hourly series for one day at the given coordinates
    async fn hourly(
        &self,
        latitude: f64,
        longitude: f64,
        date: NaiveDate,
    ) -> Result<Vec<HourlySample>, WeatherError>;
}

/// Open-Meteo archive HTTP client
#[derive(Debug)]
pub struct OpenMeteoArchiveClient {
    client: Client,
    config: ArchiveConfig,
    last_request: Mutex<Option<Instant>>,
}

impl OpenMeteoArchiveClient {
    /// Create a new archive client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: ArchiveConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config,
            last_request: Mutex::new(None),
        })
    }

    /// Create a new client with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_defaults() -> Result<Self, WeatherError> {
        Self::new(ArchiveConfig::default())
    }

    fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), WeatherError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherError::InvalidCoordinates);
        }
        Ok(())
    }

    /// Query parameters for a single-day request
    fn query(&self, latitude: f64, longitude: f64, date: NaiveDate) -> Vec<(&'static str, String)> {
        let day = date.format("%Y-%m-%d").to_string();
        vec![
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("start_date", day.clone()),
            ("end_date", day),
            ("hourly", HOURLY_VARIABLES.to_string()),
            ("temperature_unit", self.config.temperature_unit.clone()),
            ("wind_speed_unit", self.config.wind_speed_unit.clone()),
            ("precipitation_unit", self.config.precipitation_unit.clone()),
            ("timezone", self.config.timezone.clone()),
        ]
    }

    async fn pace(&self) {
        let interval = Duration::from_millis(self.config.request_interval_ms);
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let wait = interval.saturating_sub(previous.elapsed());
            if !wait.is_zero() {
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[async_trait]
impl ArchiveClient for OpenMeteoArchiveClient {
    #[instrument(skip(self), fields(lat = %latitude, lon = %longitude, %date))]
    async fn hourly(
        &self,
        latitude: f64,
        longitude: f64,
        date: NaiveDate,
    ) -> Result<Vec<HourlySample>, WeatherError> {
        Self::validate_coordinates(latitude, longitude)?;
        self.pace().await;

        let url = format!("{}/archive", self.config.base_url);
        debug!(url = %url, "Fetching archived weather");

        let response = self
            .client
            .get(&url)
            .query(&self.query(latitude, longitude, date))
            .send()
            .await
            .map_err(|e| WeatherError::from_send(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::from_status(status));
        }

        let api_response: ArchiveResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::ParseError(e.to_string()))?;

        let hourly = api_response.hourly.ok_or_else(|| {
            WeatherError::ParseError("No hourly data in response".to_string())
        })?;
        let samples = hourly.into_samples()?;

        debug!(
            samples = samples.len(),
            timezone = api_response.timezone.as_deref().unwrap_or("unknown"),
            "Received hourly series"
        );
        Ok(samples)
    }
}
