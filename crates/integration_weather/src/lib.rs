//! Weather data sources
//!
//! Client for the Open-Meteo historical archive (<https://open-meteo.com>) and a
//! downloader for ASOS station observations from the Iowa Environmental Mesonet.
//! Neither service requires an API key.

pub mod archive;
pub mod asos;
mod error;
mod models;

pub use archive::{ArchiveClient, ArchiveConfig, OpenMeteoArchiveClient};
pub use asos::{AsosClient, AsosConfig, AsosRequest};
pub use error::WeatherError;
pub use models::HOURLY_VARIABLES;
