//! Composite key for weather lookups

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::GeoLocation;

/// A (latitude, longitude, date) triple identifying one archived weather day
///
/// Equality and hashing compare the coordinate bit patterns, so two keys are
/// equal exactly when they were built from the same geocoded coordinates.
/// `-0.0` is folded into `0.0`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeatherKey {
    latitude: f64,
    longitude: f64,
    date: NaiveDate,
}

impl WeatherKey {
    /// Build a key from a location and a calendar date
    #[must_use]
    pub fn new(location: GeoLocation, date: NaiveDate) -> Self {
        Self {
            latitude: normalize_zero(location.latitude()),
            longitude: normalize_zero(location.longitude()),
            date,
        }
    }

    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// The coordinates part of the key
    #[must_use]
    pub const fn location(&self) -> GeoLocation {
        GeoLocation::new_unchecked(self.latitude, self.longitude)
    }
}

#[allow(clippy::float_cmp)]
fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

impl PartialEq for WeatherKey {
    fn eq(&self, other: &Self) -> bool {
        self.latitude.to_bits() == other.latitude.to_bits()
            && self.longitude.to_bits() == other.longitude.to_bits()
            && self.date == other.date
    }
}

impl Eq for WeatherKey {}

impl Hash for WeatherKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.latitude.to_bits().hash(state);
        self.longitude.to_bits().hash(state);
        self.date.hash(state);
    }
}

impl fmt::Display for WeatherKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) on {}", self.latitude, self.longitude, self.date)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn equal_inputs_make_equal_keys() {
        let loc = GeoLocation::new_unchecked(30.39, -97.92);
        let a = WeatherKey::new(loc, date(2024, 3, 1));
        let b = WeatherKey::new(loc, date(2024, 3, 1));
        assert_eq!(a, b);

        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn different_dates_make_different_keys() {
        let loc = GeoLocation::new_unchecked(30.39, -97.92);
        assert_ne!(
            WeatherKey::new(loc, date(2024, 3, 1)),
            WeatherKey::new(loc, date(2024, 3, 2))
        );
    }

    #[test]
    fn negative_zero_is_folded() {
        let a = WeatherKey::new(GeoLocation::new_unchecked(0.0, 10.0), date(2024, 1, 1));
        let b = WeatherKey::new(GeoLocation::new_unchecked(-0.0, 10.0), date(2024, 1, 1));
        assert_eq!(a, b);
    }

    #[test]
    fn location_round_trips() {
        let loc = GeoLocation::new_unchecked(41.8781, -87.6298);
        let key = WeatherKey::new(loc, date(2023, 1, 1));
        assert_eq!(key.location(), loc);
        assert_eq!(key.date(), date(2023, 1, 1));
    }

    #[test]
    fn display_includes_date() {
        let key = WeatherKey::new(GeoLocation::new_unchecked(41.5, -87.25), date(2023, 1, 1));
        assert_eq!(key.to_string(), "(41.5, -87.25) on 2023-01-01");
    }

    #[test]
    fn serializes_date_as_iso_string() {
        let key = WeatherKey::new(GeoLocation::new_unchecked(41.5, -87.25), date(2023, 1, 1));
        let json = serde_json::to_string(&key).unwrap();
        assert!(json.contains("\"2023-01-01\""));
        let back: WeatherKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
