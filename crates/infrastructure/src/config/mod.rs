//! Application configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `catch-weather.toml` (or an explicit file), then `CATCH_WEATHER__*`
//! environment variables. Split into sub-modules:
//! - `cache`: snapshot file locations and flush cadence
//! - `resilience`: retry settings for the HTTP adapters

mod cache;
mod resilience;

use std::path::Path;

use application::services::EnrichmentConfig;
use integration_geocoding::NominatimConfig;
use integration_weather::{ArchiveConfig, AsosConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::persistence::CsvTableConfig;
use crate::telemetry::LoggingConfig;

pub use cache::{CacheConfig, GEOCODE_CACHE_FILE, WEATHER_CACHE_FILE};
pub use resilience::RetryAppConfig;

/// Base name of the optional configuration file in the working directory
pub const CONFIG_FILE_NAME: &str = "catch-weather";

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "CATCH_WEATHER";

/// Public Nominatim instance whose usage policy caps clients at one request per second
const PUBLIC_NOMINATIM_HOST: &str = "nominatim.openstreetmap.org";

/// Minimum request spacing accepted for the public Nominatim instance
const PUBLIC_NOMINATIM_MIN_INTERVAL_MS: u64 = 1000;

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Catch table layout
    #[serde(default)]
    pub input: CsvTableConfig,

    /// Cache snapshot files
    #[serde(default)]
    pub cache: CacheConfig,

    /// Nominatim geocoder
    #[serde(default)]
    pub geocoding: NominatimConfig,

    /// Open-Meteo historical archive
    #[serde(default)]
    pub weather: ArchiveConfig,

    /// Iowa Environmental Mesonet ASOS download
    #[serde(default)]
    pub asos: AsosConfig,

    /// Pipeline settings
    #[serde(default)]
    pub enrichment: EnrichmentConfig,

    /// Retry behavior for both HTTP adapters
    #[serde(default)]
    pub retry: RetryAppConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Geocoder spacing as configured, when it had to be raised
    #[serde(skip)]
    lowered_geocoder_interval_ms: Option<u64>,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// With `path` the file must exist; otherwise `catch-weather.{toml,json,yaml}`
    /// in the working directory is used when present. Environment variables
    /// such as `CATCH_WEATHER__CACHE__FLUSH_INTERVAL=25` override both.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(CONFIG_FILE_NAME).required(false),
        };

        let builder = config::Config::builder().add_source(file).add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: Self = builder.build()?.try_deserialize()?;
        config.enforce_provider_limits();
        Ok(config)
    }

    /// Parse configuration from a TOML document, without environment overrides
    pub fn from_toml_str(toml: &str) -> Result<Self, config::ConfigError> {
        let mut config: Self = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.enforce_provider_limits();
        Ok(config)
    }

    /// Raise the geocoder spacing to the public instance's policy minimum
    ///
    /// Self-hosted or mock servers may use any spacing. The configured value is
    /// kept for [`AppConfig::log_adjustments`], since loading happens before
    /// logging is set up.
    fn enforce_provider_limits(&mut self) {
        if self.geocoding.base_url.contains(PUBLIC_NOMINATIM_HOST)
            && self.geocoding.min_interval_ms < PUBLIC_NOMINATIM_MIN_INTERVAL_MS
        {
            self.lowered_geocoder_interval_ms = Some(self.geocoding.min_interval_ms);
            self.geocoding.min_interval_ms = PUBLIC_NOMINATIM_MIN_INTERVAL_MS;
        }
    }

    /// The geocoder spacing from the configuration sources, if it was raised
    #[must_use]
    pub const fn lowered_geocoder_interval_ms(&self) -> Option<u64> {
        self.lowered_geocoder_interval_ms
    }

    /// Report adjustments made while loading
    ///
    /// Call once the subscriber from [`crate::init_logging`] is installed.
    pub fn log_adjustments(&self) {
        debug!(
            geocoder = %self.geocoding.base_url,
            archive = %self.weather.base_url,
            "Configuration loaded"
        );
        if let Some(configured_ms) = self.lowered_geocoder_interval_ms {
            warn!(
                configured_ms,
                enforced_ms = self.geocoding.min_interval_ms,
                "Geocoder interval below the public Nominatim limit; raising it"
            );
        }
    }
}
