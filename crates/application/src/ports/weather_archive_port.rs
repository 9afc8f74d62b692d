//! Historical weather port
//!
//! Defines the interface for retrieving one day of archived hourly weather.

use async_trait::async_trait;
use domain::value_objects::{HourlySample, WeatherKey};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for historical weather lookups
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherArchivePort: Send + Sync {
    /// Fetch the ordered hourly series for the day and coordinates in `key`
    ///
    /// Transient failures are expected to be retried below this port; an error
    /// returned here is final for the current run.
    async fn hourly_weather(&self, key: &WeatherKey) -> Result<Vec<HourlySample>, ApplicationError>;
}
