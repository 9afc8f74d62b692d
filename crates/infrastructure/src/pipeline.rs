//! Composition of a complete enrichment run
//!
//! Builds the adapters and file-backed caches from [`AppConfig`], reads the
//! catch table, runs [`EnrichmentService`] and writes the enriched table.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::{GeocodingPort, SnapshotStore, WeatherArchivePort};
use application::services::{
    EnrichmentReport, EnrichmentService, GeocodeCache, PersistentCache, WeatherCache,
};
use domain::value_objects::{GeoLocation, NoonWeather, WeatherKey};
use tracing::{info, instrument};

use crate::adapters::{GeocodingAdapter, WeatherArchiveAdapter};
use crate::config::AppConfig;
use crate::persistence::{
    FileSnapshotStore, read_catch_table_from_path, write_catch_table_to_path,
};

/// Files touched by one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub input: PathBuf,
    pub output: PathBuf,
    pub geocode_cache: PathBuf,
    pub weather_cache: PathBuf,
}

impl RunPaths {
    /// Cache paths from the configuration, defaulting to the input's directory
    #[must_use]
    pub fn resolve(
        config: &AppConfig,
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        let input = input.into();
        Self {
            geocode_cache: config.cache.geocode_path_for(&input),
            weather_cache: config.cache.weather_path_for(&input),
            output: output.into(),
            input,
        }
    }
}

/// Open the geocode cache stored at `path`
pub async fn open_geocode_cache(
    path: &Path,
    flush_interval: usize,
) -> Result<GeocodeCache, ApplicationError> {
    let store: Arc<dyn SnapshotStore<String, Option<GeoLocation>>> =
        Arc::new(FileSnapshotStore::new(path));
    PersistentCache::open(store, flush_interval).await
}

/// Open the weather cache stored at `path`
pub async fn open_weather_cache(
    path: &Path,
    flush_interval: usize,
) -> Result<WeatherCache, ApplicationError> {
    let store: Arc<dyn SnapshotStore<WeatherKey, NoonWeather>> =
        Arc::new(FileSnapshotStore::new(path));
    PersistentCache::open(store, flush_interval).await
}

/// Pipeline service backed by the Nominatim and Open-Meteo adapters
pub fn build_service(config: &AppConfig) -> Result<EnrichmentService, ApplicationError> {
    let retry = config.retry.to_retry_config();
    let geocoder: Arc<dyn GeocodingPort> =
        Arc::new(GeocodingAdapter::new(&config.geocoding, retry.clone())?);
    let archive: Arc<dyn WeatherArchivePort> =
        Arc::new(WeatherArchiveAdapter::new(config.weather.clone(), retry)?);
    Ok(EnrichmentService::new(geocoder, archive).with_config(config.enrichment.clone()))
}

/// Enrich `paths.input` into `paths.output`
///
/// An unreadable input aborts before any cache is opened or request sent.
#[instrument(skip(config), fields(input = %paths.input.display()))]
pub async fn run_enrichment(
    config: &AppConfig,
    paths: &RunPaths,
) -> Result<EnrichmentReport, ApplicationError> {
    let mut table = read_catch_table_from_path(&paths.input, &config.input)?;

    let service = build_service(config)?;
    let mut geocode_cache =
        open_geocode_cache(&paths.geocode_cache, config.cache.flush_interval).await?;
    let mut weather_cache =
        open_weather_cache(&paths.weather_cache, config.cache.flush_interval).await?;
    info!(
        geocodes = geocode_cache.len(),
        weather = weather_cache.len(),
        "Caches loaded"
    );

    let report = service
        .enrich(&mut table, &mut geocode_cache, &mut weather_cache)
        .await?;

    write_catch_table_to_path(&paths.output, &table)?;
    info!(output = %paths.output.display(), "Wrote enriched table");
    Ok(report)
}

/// Which cache a snapshot belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    Geocode,
    Weather,
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geocode => write!(f, "geocode"),
            Self::Weather => write!(f, "weather"),
        }
    }
}

/// Entry counts of one cache snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSummary {
    pub kind: CacheKind,
    pub location: String,
    pub entries: usize,
    /// Geocode misses, or weather entries without any value
    pub sentinels: usize,
}

impl fmt::Display for CacheSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cache {}: {} entries ({} empty)",
            self.kind, self.location, self.entries, self.sentinels
        )
    }
}

/// Count the entries of a geocode snapshot
pub async fn inspect_geocode_cache(path: &Path) -> Result<CacheSummary, ApplicationError> {
    let cache = open_geocode_cache(path, 1).await?;
    Ok(CacheSummary {
        kind: CacheKind::Geocode,
        location: cache.location(),
        entries: cache.len(),
        sentinels: cache.iter().filter(|(_, value)| value.is_none()).count(),
    })
}

/// Count the entries of a weather snapshot
pub async fn inspect_weather_cache(path: &Path) -> Result<CacheSummary, ApplicationError> {
    let cache = open_weather_cache(path, 1).await?;
    Ok(CacheSummary {
        kind: CacheKind::Weather,
        location: cache.location(),
        entries: cache.len(),
        sentinels: cache
            .iter()
            .filter(|(_, value)| value.values().iter().all(Option::is_none))
            .count(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::NaiveDate;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn run_paths_default_next_to_input() {
        let config = AppConfig::default();
        let paths = RunPaths::resolve(&config, "data/catches.csv", "out.csv");

        assert_eq!(paths.geocode_cache, PathBuf::from("data/geocode_cache.bin"));
        assert_eq!(paths.weather_cache, PathBuf::from("data/weather_cache.bin"));
        assert_eq!(paths.output, PathBuf::from("out.csv"));
    }

    #[tokio::test]
    async fn inspect_missing_snapshot_is_empty() {
        let dir = TempDir::new().unwrap();
        let summary = inspect_geocode_cache(&dir.path().join("geo.bin")).await.unwrap();

        assert_eq!(summary.kind, CacheKind::Geocode);
        assert_eq!(summary.entries, 0);
        assert_eq!(summary.sentinels, 0);
    }

    #[tokio::test]
    async fn inspect_counts_sentinels() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("geo.json");
        let store = FileSnapshotStore::<String, Option<GeoLocation>>::new(&path);
        store
            .save(&HashMap::from([
                (
                    "Lake Travis, Texas".to_string(),
                    Some(GeoLocation::new_unchecked(30.42, -97.91)),
                ),
                ("Nowhere Pond".to_string(), None),
            ]))
            .await
            .unwrap();

        let summary = inspect_geocode_cache(&path).await.unwrap();
        assert_eq!(summary.entries, 2);
        assert_eq!(summary.sentinels, 1);
        assert!(summary.to_string().starts_with("geocode cache "));
    }

    #[tokio::test]
    async fn inspect_weather_counts_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wx.bin");
        let key = WeatherKey::new(
            GeoLocation::new_unchecked(30.42, -97.91),
            NaiveDate::from_ymd_opt(2023, 5, 14).unwrap(),
        );
        let store = FileSnapshotStore::<WeatherKey, NoonWeather>::new(&path);
        store
            .save(&HashMap::from([(key, NoonWeather::default())]))
            .await
            .unwrap();

        let summary = inspect_weather_cache(&path).await.unwrap();
        assert_eq!(summary.kind, CacheKind::Weather);
        assert_eq!(summary.entries, 1);
        assert_eq!(summary.sentinels, 1);
    }

    #[tokio::test]
    async fn unreadable_input_aborts_before_caches() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::default();
        let paths = RunPaths::resolve(
            &config,
            dir.path().join("missing.csv"),
            dir.path().join("out.csv"),
        );

        let err = run_enrichment(&config, &paths).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Storage(_)));
        assert!(!paths.geocode_cache.exists());
        assert!(!paths.output.exists());
    }
}
