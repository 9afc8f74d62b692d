//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports over Nominatim and the Open-Meteo
//! archive, stores cache snapshots on disk, reads and writes the catch table,
//! and wires everything into a runnable pipeline.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod pipeline;
pub mod retry;
pub mod telemetry;

pub use adapters::{GeocodingAdapter, WeatherArchiveAdapter};
pub use config::{AppConfig, CacheConfig, RetryAppConfig};
pub use persistence::{CsvTableConfig, FileSnapshotStore, SnapshotFormat};
pub use pipeline::{
    CacheKind, CacheSummary, RunPaths, build_service, inspect_geocode_cache,
    inspect_weather_cache, open_geocode_cache, open_weather_cache, run_enrichment,
};
pub use retry::{RetryConfig, RetryResult, Retryable, retry, with_retry};
pub use telemetry::{LogFormat, LoggingConfig, TelemetryError, init_logging};
