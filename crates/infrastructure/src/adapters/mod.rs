//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod geocoding_adapter;
mod weather_archive_adapter;

pub use geocoding_adapter::GeocodingAdapter;
pub use weather_archive_adapter::WeatherArchiveAdapter;
