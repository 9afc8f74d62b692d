//! Enrichment pipeline
//!
//! Geocodes every distinct location name, joins coordinates back onto the
//! records, fetches noon weather for every distinct (coordinates, date) pair and
//! joins those values back as well. Both lookups go through a [`PersistentCache`]
//! so a rerun against the same cache files issues no network calls.

use std::fmt;
use std::sync::Arc;

use domain::entities::CatchTable;
use domain::value_objects::{GeoLocation, NOON_HOUR_INDEX, NoonWeather, WeatherKey};
use domain::DomainError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::persistent_cache::{GeocodeCache, PersistentCache, WeatherCache};
use crate::error::ApplicationError;
use crate::ports::{GeocodingPort, WeatherArchivePort};

/// Pipeline tuning knobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    /// Index into the hourly series used as the noon approximation
    #[serde(default = "default_noon_hour_index")]
    pub noon_hour_index: usize,
}

const fn default_noon_hour_index() -> usize {
    NOON_HOUR_INDEX
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            noon_hour_index: default_noon_hour_index(),
        }
    }
}

/// Result of resolving one location name
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// Answered from the cache (coordinates or a remembered miss)
    Cached,
    /// Geocoded in this run
    Resolved(GeoLocation),
    /// The geocoder had no result; a sentinel was cached
    NotFound,
    /// The lookup failed; nothing was cached
    Failed(String),
}

/// Result of fetching weather for one (coordinates, date) pair
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherOutcome {
    /// Answered from the cache
    Cached,
    /// Fetched and cached in this run
    Fetched,
    /// The archive returned too few hourly samples; nothing was cached
    InsufficientData {
        /// Number of samples the archive returned
        samples: usize,
    },
    /// The request failed; nothing was cached
    Failed(String),
}

/// Per-item outcomes of one pipeline run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichmentReport {
    /// One entry per distinct location name, in first-seen order
    pub locations: Vec<(String, LookupOutcome)>,
    /// One entry per distinct weather key, in first-seen order
    pub weather: Vec<(WeatherKey, WeatherOutcome)>,
    /// Records that ended up with coordinates
    pub rows_with_coordinates: usize,
    /// Records that ended up with weather values
    pub rows_with_weather: usize,
    /// Periodic flushes that failed and were skipped
    pub flush_failures: usize,
}

impl EnrichmentReport {
    /// Number of network lookups issued for locations
    #[must_use]
    pub fn geocode_requests(&self) -> usize {
        self.locations
            .iter()
            .filter(|(_, outcome)| !matches!(outcome, LookupOutcome::Cached))
            .count()
    }

    /// Number of network requests issued for weather
    #[must_use]
    pub fn weather_requests(&self) -> usize {
        self.weather
            .iter()
            .filter(|(_, outcome)| !matches!(outcome, WeatherOutcome::Cached))
            .count()
    }

    /// Location names that hit a transient failure
    pub fn failed_locations(&self) -> impl Iterator<Item = &str> {
        self.locations.iter().filter_map(|(name, outcome)| {
            matches!(outcome, LookupOutcome::Failed(_)).then_some(name.as_str())
        })
    }
}

impl fmt::Display for EnrichmentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let not_found = self
            .locations
            .iter()
            .filter(|(_, o)| matches!(o, LookupOutcome::NotFound))
            .count();
        let skipped = self
            .weather
            .iter()
            .filter(|(_, o)| {
                matches!(o, WeatherOutcome::InsufficientData { .. } | WeatherOutcome::Failed(_))
            })
            .count();
        write!(
            f,
            "{} locations ({} looked up, {} not found), {} weather keys ({} fetched, {} skipped), \
             {} rows with coordinates, {} rows with weather",
            self.locations.len(),
            self.geocode_requests(),
            not_found,
            self.weather.len(),
            self.weather_requests(),
            skipped,
            self.rows_with_coordinates,
            self.rows_with_weather,
        )
    }
}

/// Drives the geocode and weather stages over a catch table
pub struct EnrichmentService {
    geocoder: Arc<dyn GeocodingPort>,
    archive: Arc<dyn WeatherArchivePort>,
    config: EnrichmentConfig,
}

impl fmt::Debug for EnrichmentService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnrichmentService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl EnrichmentService {
    /// Create a pipeline with the default noon index
    pub fn new(geocoder: Arc<dyn GeocodingPort>, archive: Arc<dyn WeatherArchivePort>) -> Self {
        Self {
            geocoder,
            archive,
            config: EnrichmentConfig::default(),
        }
    }

    /// Override the pipeline configuration
    #[must_use]
    pub fn with_config(mut self, config: EnrichmentConfig) -> Self {
        self.config = config;
        self
    }

    /// Run all four stages
    ///
    /// Each cache is flushed once its stage completes.
    ///
    /// # Errors
    ///
    /// Returns an error only when a final cache flush fails. Per-item failures
    /// are recorded in the report.
    #[instrument(skip_all, fields(records = table.len()))]
    pub async fn enrich(
        &self,
        table: &mut CatchTable,
        geocode_cache: &mut GeocodeCache,
        weather_cache: &mut WeatherCache,
    ) -> Result<EnrichmentReport, ApplicationError> {
        let mut report = EnrichmentReport::default();

        let names = table.unique_locations();
        report.locations = self
            .resolve_locations(&names, geocode_cache, &mut report.flush_failures)
            .await;
        finish(geocode_cache).await?;
        report.rows_with_coordinates = attach_coordinates(table, geocode_cache);

        let keys = table.unique_weather_keys();
        report.weather = self
            .resolve_weather(&keys, weather_cache, &mut report.flush_failures)
            .await;
        finish(weather_cache).await?;
        report.rows_with_weather = attach_weather(table, weather_cache);

        info!(%report, "Enrichment finished");
        Ok(report)
    }

    /// Geocode every name missing from the cache
    ///
    /// A definite miss is cached as `None` and never retried. Transient failures
    /// are reported but leave the cache untouched.
    pub async fn resolve_locations(
        &self,
        names: &[String],
        cache: &mut GeocodeCache,
        flush_failures: &mut usize,
    ) -> Vec<(String, LookupOutcome)> {
        let mut outcomes = Vec::with_capacity(names.len());

        for name in names {
            if cache.contains(name) {
                debug!(location = %name, "Geocode cache hit");
                outcomes.push((name.clone(), LookupOutcome::Cached));
                continue;
            }

            let (value, outcome) = match self.geocoder.geocode(name).await {
                Ok(location) => {
                    debug!(location = %name, coordinates = %location, "Geocoded");
                    (Some(location), LookupOutcome::Resolved(location))
                },
                Err(e) if e.is_not_found() => {
                    warn!(location = %name, "No geocoding result, caching miss");
                    (None, LookupOutcome::NotFound)
                },
                Err(e) => {
                    warn!(location = %name, error = %e, "Geocoding failed");
                    outcomes.push((name.clone(), LookupOutcome::Failed(e.to_string())));
                    continue;
                },
            };

            match value {
                Some(location) => {
                    if cache.insert(name.clone(), Some(location)) {
                        periodic_flush(cache, flush_failures).await;
                    }
                },
                None => cache.insert_sentinel(name.clone(), None),
            }
            outcomes.push((name.clone(), outcome));
        }

        outcomes
    }

    /// Fetch noon weather for every key missing from the cache
    ///
    /// Failures and short series are reported and not cached.
    pub async fn resolve_weather(
        &self,
        keys: &[WeatherKey],
        cache: &mut WeatherCache,
        flush_failures: &mut usize,
    ) -> Vec<(WeatherKey, WeatherOutcome)> {
        let mut outcomes = Vec::with_capacity(keys.len());

        for key in keys {
            if cache.contains(key) {
                debug!(%key, "Weather cache hit");
                outcomes.push((*key, WeatherOutcome::Cached));
                continue;
            }

            let samples = match self.archive.hourly_weather(key).await {
                Ok(samples) => samples,
                Err(e) => {
                    warn!(%key, error = %e, "Weather request failed");
                    outcomes.push((*key, WeatherOutcome::Failed(e.to_string())));
                    continue;
                },
            };

            match NoonWeather::select(&samples, self.config.noon_hour_index) {
                Ok(noon) => {
                    if cache.insert(*key, noon) {
                        periodic_flush(cache, flush_failures).await;
                    }
                    outcomes.push((*key, WeatherOutcome::Fetched));
                },
                Err(DomainError::InsufficientData { available, .. }) => {
                    warn!(%key, samples = available, "Not enough hourly samples, skipping");
                    outcomes.push((*key, WeatherOutcome::InsufficientData { samples: available }));
                },
                Err(e) => {
                    outcomes.push((*key, WeatherOutcome::Failed(e.to_string())));
                },
            }
        }

        outcomes
    }
}

/// Copy cached coordinates onto every record by location name
///
/// Returns the number of records that have coordinates afterwards.
pub fn attach_coordinates(table: &mut CatchTable, cache: &GeocodeCache) -> usize {
    let mut attached = 0;
    for record in &mut table.records {
        record.coordinates = cache.get(&record.location).copied().flatten();
        if record.coordinates.is_some() {
            attached += 1;
        }
    }
    attached
}

/// Copy cached noon weather onto every record by (coordinates, date)
///
/// Returns the number of records that have weather afterwards.
pub fn attach_weather(table: &mut CatchTable, cache: &WeatherCache) -> usize {
    let mut attached = 0;
    for record in &mut table.records {
        record.weather = record.weather_key().and_then(|key| cache.get(&key).copied());
        if record.weather.is_some() {
            attached += 1;
        }
    }
    attached
}

async fn periodic_flush<K, V>(cache: &mut PersistentCache<K, V>, failures: &mut usize)
where
    K: Eq + std::hash::Hash + Send + Sync,
    V: Send + Sync,
{
    match cache.flush().await {
        Ok(()) => info!(location = %cache.location(), entries = cache.len(), "Cache checkpoint"),
        Err(e) => {
            *failures += 1;
            warn!(location = %cache.location(), error = %e, "Periodic cache flush failed");
        },
    }
}

async fn finish<K, V>(cache: &mut PersistentCache<K, V>) -> Result<(), ApplicationError>
where
    K: Eq + std::hash::Hash + Send + Sync,
    V: Send + Sync,
{
    if cache.has_unsaved_changes() {
        cache.flush().await?;
        info!(location = %cache.location(), entries = cache.len(), "Cache saved");
    }
    Ok(())
}
