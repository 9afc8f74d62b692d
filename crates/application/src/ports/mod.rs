//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod geocoding_port;
mod snapshot_store;
mod weather_archive_port;

#[cfg(test)]
pub use geocoding_port::MockGeocodingPort;
pub use geocoding_port::GeocodingPort;
pub use snapshot_store::SnapshotStore;
#[cfg(test)]
pub use weather_archive_port::MockWeatherArchivePort;
pub use weather_archive_port::WeatherArchivePort;
