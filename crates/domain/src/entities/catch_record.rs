//! Catch records and the table they are read from

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::value_objects::{GeoLocation, NoonWeather, WeatherKey};

/// One row of a catch export
///
/// Identity is the row position in the source table; two rows with the same
/// content are still distinct records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchRecord {
    /// Zero-based position in the source table
    pub row: usize,
    /// Location name as written in the export (e.g. a lake name)
    pub location: String,
    /// Catch date, `None` when the raw value could not be parsed
    pub date: Option<NaiveDate>,
    /// Raw cell values, aligned with [`CatchTable::headers`]
    pub fields: Vec<String>,
    /// Coordinates once geocoded
    pub coordinates: Option<GeoLocation>,
    /// Noon weather once fetched
    pub weather: Option<NoonWeather>,
}

impl CatchRecord {
    #[must_use]
    pub fn new(row: usize, location: impl Into<String>, date: Option<NaiveDate>, fields: Vec<String>) -> Self {
        Self {
            row,
            location: location.into(),
            date,
            fields,
            coordinates: None,
            weather: None,
        }
    }

    /// Weather lookup key, available once both coordinates and date are known
    #[must_use]
    pub fn weather_key(&self) -> Option<WeatherKey> {
        Some(WeatherKey::new(self.coordinates?, self.date?))
    }
}

/// A catch export: header row plus records in source order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatchTable {
    pub headers: Vec<String>,
    pub records: Vec<CatchRecord>,
}

impl CatchTable {
    #[must_use]
    pub const fn new(headers: Vec<String>, records: Vec<CatchRecord>) -> Self {
        Self { headers, records }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct location names in first-seen order
    #[must_use]
    pub fn unique_locations(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|record| seen.insert(record.location.as_str()))
            .map(|record| record.location.clone())
            .collect()
    }

    /// Distinct weather keys in first-seen order
    ///
    /// Records without coordinates or without a date are skipped.
    #[must_use]
    pub fn unique_weather_keys(&self) -> Vec<WeatherKey> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter_map(CatchRecord::weather_key)
            .filter(|key| seen.insert(*key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(row: usize, location: &str, date: Option<NaiveDate>) -> CatchRecord {
        CatchRecord::new(row, location, date, vec![location.to_string()])
    }

    #[test]
    fn unique_locations_keep_first_seen_order() {
        let table = CatchTable::new(
            vec!["lake_name".into()],
            vec![
                record(0, "Lake Travis", None),
                record(1, "Lake Fork", None),
                record(2, "Lake Travis", None),
            ],
        );
        assert_eq!(table.unique_locations(), vec!["Lake Travis", "Lake Fork"]);
    }

    #[test]
    fn weather_key_requires_coordinates_and_date() {
        let mut rec = record(0, "Lake Travis", Some(date(2024, 3, 1)));
        assert!(rec.weather_key().is_none());

        rec.coordinates = Some(GeoLocation::new_unchecked(30.4, -97.9));
        assert!(rec.weather_key().is_some());

        rec.date = None;
        assert!(rec.weather_key().is_none());
    }

    #[test]
    fn unique_weather_keys_skip_incomplete_rows_and_duplicates() {
        let travis = GeoLocation::new_unchecked(30.4, -97.9);
        let mut rows = vec![
            record(0, "Lake Travis", Some(date(2024, 3, 1))),
            record(1, "Lake Travis", Some(date(2024, 3, 1))),
            record(2, "Lake Travis", None),
            record(3, "Nowhere", Some(date(2024, 3, 1))),
            record(4, "Lake Travis", Some(date(2024, 3, 2))),
        ];
        for row in &mut rows {
            if row.location == "Lake Travis" {
                row.coordinates = Some(travis);
            }
        }
        let table = CatchTable::new(vec!["lake_name".into()], rows);

        let keys = table.unique_weather_keys();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].date(), date(2024, 3, 1));
        assert_eq!(keys[1].date(), date(2024, 3, 2));
    }

    #[test]
    fn empty_table() {
        let table = CatchTable::default();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert!(table.unique_locations().is_empty());
        assert!(table.unique_weather_keys().is_empty());
    }
}
