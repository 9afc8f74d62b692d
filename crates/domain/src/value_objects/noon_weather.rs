//! Hourly weather samples and the noon snapshot attached to catch records

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Hourly index used as a proxy for midday conditions
///
/// The index is taken in whatever timezone the hourly series was requested in;
/// no UTC-offset correction is applied.
pub const NOON_HOUR_INDEX: usize = 12;

/// Output column names for the seven noon weather fields, in output order
pub const NOON_WEATHER_COLUMNS: [&str; 7] = [
    "noon_temperature_2m",
    "noon_cloud_cover",
    "noon_rain",
    "noon_snowfall",
    "noon_surface_pressure",
    "noon_pressure_msl",
    "noon_wind_speed_10m",
];

/// One hour of archived weather
///
/// Archive values can be missing for individual hours, so every measurement is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySample {
    /// Start of the hour in the requested timezone
    pub time: NaiveDateTime,
    /// Air temperature at 2 m
    pub temperature_2m: Option<f64>,
    /// Total cloud cover in percent
    pub cloud_cover: Option<f64>,
    /// Liquid precipitation
    pub rain: Option<f64>,
    /// Snowfall
    pub snowfall: Option<f64>,
    /// Surface pressure in hPa
    pub surface_pressure: Option<f64>,
    /// Pressure reduced to mean sea level in hPa
    pub pressure_msl: Option<f64>,
    /// Wind speed at 10 m
    pub wind_speed_10m: Option<f64>,
}

/// The seven weather fields sampled at the noon approximation hour
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NoonWeather {
    pub temperature_2m: Option<f64>,
    pub cloud_cover: Option<f64>,
    pub rain: Option<f64>,
    pub snowfall: Option<f64>,
    pub surface_pressure: Option<f64>,
    pub pressure_msl: Option<f64>,
    pub wind_speed_10m: Option<f64>,
}

impl NoonWeather {
    /// Pick the sample at `hour_index` from an ordered hourly series
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InsufficientData` when the series has no sample at
    /// `hour_index` (fewer than `hour_index + 1` samples).
    pub fn select(samples: &[HourlySample], hour_index: usize) -> Result<Self, DomainError> {
        samples
            .get(hour_index)
            .map(Self::from)
            .ok_or_else(|| DomainError::insufficient_data(samples.len(), hour_index + 1))
    }

    /// Field values in the order of [`NOON_WEATHER_COLUMNS`]
    #[must_use]
    pub const fn values(&self) -> [Option<f64>; 7] {
        [
            self.temperature_2m,
            self.cloud_cover,
            self.rain,
            self.snowfall,
            self.surface_pressure,
            self.pressure_msl,
            self.wind_speed_10m,
        ]
    }
}

impl From<&HourlySample> for NoonWeather {
    fn from(sample: &HourlySample) -> Self {
        Self {
            temperature_2m: sample.temperature_2m,
            cloud_cover: sample.cloud_cover,
            rain: sample.rain,
            snowfall: sample.snowfall,
            surface_pressure: sample.surface_pressure,
            pressure_msl: sample.pressure_msl,
            wind_speed_10m: sample.wind_speed_10m,
        }
    }
}
