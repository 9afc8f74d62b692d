//! Nominatim geocoding for catch-weather
//!
//! Resolves lake and location names to coordinates through
//! [Nominatim/OpenStreetMap](https://nominatim.openstreetmap.org).
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_geocoding::{GeocodingClient, NominatimConfig, NominatimGeocodingClient};
//!
//! let client = NominatimGeocodingClient::new(&NominatimConfig::default())?;
//! let location = client.geocode("Lake Travis, Texas").await?;
//! ```

mod client;
mod config;
mod error;

pub use client::{GeocodingClient, NominatimGeocodingClient};
pub use config::NominatimConfig;
pub use error::GeocodingError;
