//! Application services - Use case implementations

mod enrichment_service;
mod persistent_cache;

pub use enrichment_service::{
    attach_coordinates, attach_weather, EnrichmentConfig, EnrichmentReport, EnrichmentService,
    LookupOutcome, WeatherOutcome,
};
pub use persistent_cache::{GeocodeCache, PersistentCache, WeatherCache, DEFAULT_FLUSH_INTERVAL};
