//! Open-Meteo archive response models

use chrono::NaiveDateTime;
use domain::value_objects::HourlySample;
use serde::Deserialize;

use crate::error::WeatherError;

/// Hourly variables requested from the archive, in response order
pub const HOURLY_VARIABLES: &str =
    "temperature_2m,cloud_cover,rain,snowfall,surface_pressure,pressure_msl,wind_speed_10m";

/// Top-level archive response
#[derive(Debug, Deserialize)]
pub(crate) struct ArchiveResponse {
    #[serde(default)]
    pub timezone: Option<String>,
    pub hourly: Option<HourlyData>,
}

/// Column-oriented hourly block; any value may be `null`
#[derive(Debug, Default, Deserialize)]
pub(crate) struct HourlyData {
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub cloud_cover: Vec<Option<f64>>,
    #[serde(default)]
    pub rain: Vec<Option<f64>>,
    #[serde(default)]
    pub snowfall: Vec<Option<f64>>,
    #[serde(default)]
    pub surface_pressure: Vec<Option<f64>>,
    #[serde(default)]
    pub pressure_msl: Vec<Option<f64>>,
    #[serde(default)]
    pub wind_speed_10m: Vec<Option<f64>>,
}

fn at(column: &[Option<f64>], index: usize) -> Option<f64> {
    column.get(index).copied().flatten()
}

fn parse_hour(s: &str) -> Result<NaiveDateTime, WeatherError> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| WeatherError::ParseError(format!("Invalid datetime format: {s}")))
}

impl HourlyData {
    /// Convert to row-oriented samples, ordered as returned
    ///
    /// Shorter value columns are padded with `None`.
    pub fn into_samples(self) -> Result<Vec<HourlySample>, WeatherError> {
        self.time
            .iter()
            .enumerate()
            .map(|(i, time)| {
                Ok(HourlySample {
                    time: parse_hour(time)?,
                    temperature_2m: at(&self.temperature_2m, i),
                    cloud_cover: at(&self.cloud_cover, i),
                    rain: at(&self.rain, i),
                    snowfall: at(&self.snowfall, i),
                    surface_pressure: at(&self.surface_pressure, i),
                    pressure_msl: at(&self.pressure_msl, i),
                    wind_speed_10m: at(&self.wind_speed_10m, i),
                })
            })
            .collect()
    }
}
