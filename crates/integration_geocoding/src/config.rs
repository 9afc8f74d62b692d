//! Nominatim client configuration

use serde::{Deserialize, Serialize};

/// Configuration for the Nominatim geocoding service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NominatimConfig {
    /// Base URL for the Nominatim API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Qualifier appended to every query (e.g. ", USA")
    #[serde(default = "default_query_suffix")]
    pub query_suffix: String,

    /// Comma-separated ISO country codes passed as `countrycodes` (empty to disable)
    #[serde(default)]
    pub country_filter: String,

    /// Minimum spacing between two requests in milliseconds
    ///
    /// Nominatim's usage policy allows at most one request per second.
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,

    /// `User-Agent` header identifying the application
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_query_suffix() -> String {
    ", USA".to_string()
}

const fn default_min_interval_ms() -> u64 {
    1000
}

fn default_user_agent() -> String {
    "lake_weather_app".to_string()
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            query_suffix: default_query_suffix(),
            country_filter: String::new(),
            min_interval_ms: default_min_interval_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl NominatimConfig {
    /// Configuration pointing at a local mock server, without rate limiting
    #[must_use]
    pub fn for_testing(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 5,
            min_interval_ms: 0,
            ..Default::default()
        }
    }

    /// Build the free-form query sent for a location name
    #[must_use]
    pub fn query_for(&self, name: &str) -> String {
        format!("{}{}", name.trim(), self.query_suffix)
    }
}
