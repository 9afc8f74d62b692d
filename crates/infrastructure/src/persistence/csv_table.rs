//! Catch table CSV reading and writing

use std::io;
use std::path::Path;

use application::error::ApplicationError;
use chrono::NaiveDate;
use domain::entities::{CatchRecord, CatchTable};
use domain::value_objects::{NOON_WEATHER_COLUMNS, date_from_parts, parse_date};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Column added for the resolved latitude
pub const LATITUDE_COLUMN: &str = "lat";
/// Column added for the resolved longitude
pub const LONGITUDE_COLUMN: &str = "lon";

/// How to interpret the input table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvTableConfig {
    /// Leading lines to skip before the header row (default: 1, a title line)
    #[serde(default = "default_skip_rows")]
    pub skip_rows: usize,

    /// Column holding the location name (default: `lake_name`)
    #[serde(default = "default_location_column")]
    pub location_column: String,

    /// Column holding a full date (default: `date`)
    #[serde(default = "default_date_column")]
    pub date_column: String,

    /// Month-name column used when there is no full date (default: `month`)
    #[serde(default = "default_month_column")]
    pub month_column: String,

    /// Day-of-month column (default: `day`)
    #[serde(default = "default_day_column")]
    pub day_column: String,

    /// Year column (default: `year`)
    #[serde(default = "default_year_column")]
    pub year_column: String,
}

const fn default_skip_rows() -> usize {
    1
}

fn default_location_column() -> String {
    "lake_name".to_string()
}

fn default_date_column() -> String {
    "date".to_string()
}

fn default_month_column() -> String {
    "month".to_string()
}

fn default_day_column() -> String {
    "day".to_string()
}

fn default_year_column() -> String {
    "year".to_string()
}

impl Default for CsvTableConfig {
    fn default() -> Self {
        Self {
            skip_rows: default_skip_rows(),
            location_column: default_location_column(),
            date_column: default_date_column(),
            month_column: default_month_column(),
            day_column: default_day_column(),
            year_column: default_year_column(),
        }
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn csv_error(e: &csv::Error) -> ApplicationError {
    ApplicationError::Storage(format!("CSV error: {e}"))
}

struct Columns {
    location: usize,
    date: Option<usize>,
    parts: Option<(usize, usize, usize)>,
}

impl Columns {
    fn resolve(headers: &[String], config: &CsvTableConfig) -> Result<Self, ApplicationError> {
        let find = |name: &str| {
            let name = normalize_header(name);
            headers.iter().position(|h| *h == name)
        };

        let location = find(&config.location_column).ok_or_else(|| {
            ApplicationError::Configuration(format!(
                "Location column '{}' not found in header [{}]",
                config.location_column,
                headers.join(", ")
            ))
        })?;
        let date = find(&config.date_column);
        let parts = match (
            find(&config.month_column),
            find(&config.day_column),
            find(&config.year_column),
        ) {
            (Some(m), Some(d), Some(y)) => Some((m, d, y)),
            _ => None,
        };

        Ok(Self {
            location,
            date,
            parts,
        })
    }

    fn date_of(&self, fields: &[String]) -> Option<NaiveDate> {
        let from_column = self
            .date
            .map(|i| fields[i].as_str())
            .filter(|raw| !raw.trim().is_empty())
            .and_then(|raw| parse_date(raw).ok());

        from_column.or_else(|| {
            self.parts
                .and_then(|(m, d, y)| date_from_parts(&fields[m], &fields[d], &fields[y]).ok())
        })
    }
}

/// Read a catch table from CSV text
///
/// # Errors
///
/// Returns an error when the CSV is malformed, has no header row after the
/// skipped lines, or lacks the location column.
pub fn read_catch_table<R: io::Read>(
    reader: R,
    config: &CsvTableConfig,
) -> Result<CatchTable, ApplicationError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut rows = reader.records().skip(config.skip_rows);

    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| ApplicationError::Configuration("Input has no header row".to_string()))?
        .map_err(|e| csv_error(&e))?
        .iter()
        .map(normalize_header)
        .collect();
    let columns = Columns::resolve(&headers, config)?;

    let mut records = Vec::new();
    for (row, result) in rows.enumerate() {
        let raw = result.map_err(|e| csv_error(&e))?;
        if raw.len() > headers.len() {
            warn!(
                row,
                cells = raw.len(),
                columns = headers.len(),
                "Row has more cells than the header, dropping the extras"
            );
        }
        let mut fields: Vec<String> = raw.iter().take(headers.len()).map(str::to_string).collect();
        fields.resize(headers.len(), String::new());

        let date = columns.date_of(&fields);
        if date.is_none() {
            debug!(row, "Row has no usable date");
        }
        let location = fields[columns.location].trim().to_string();
        records.push(CatchRecord::new(row, location, date, fields));
    }

    Ok(CatchTable::new(headers, records))
}

/// Read a catch table from a CSV file
///
/// # Errors
///
/// Returns a `Storage` error when the file cannot be opened, otherwise as
/// [`read_catch_table`].
#[instrument(skip(config), fields(path = %path.display()))]
pub fn read_catch_table_from_path(
    path: &Path,
    config: &CsvTableConfig,
) -> Result<CatchTable, ApplicationError> {
    let file = std::fs::File::open(path)
        .map_err(|e| ApplicationError::Storage(format!("Cannot open {}: {e}", path.display())))?;
    let table = read_catch_table(io::BufReader::new(file), config)?;
    info!(records = table.len(), "Read catch table");
    Ok(table)
}

fn format_value(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Header row of the enriched output
#[must_use]
pub fn output_headers(table: &CatchTable) -> Vec<String> {
    table
        .headers
        .iter()
        .cloned()
        .chain([LATITUDE_COLUMN.to_string(), LONGITUDE_COLUMN.to_string()])
        .chain(NOON_WEATHER_COLUMNS.iter().map(|c| (*c).to_string()))
        .collect()
}

/// Write the enriched table: input columns, then coordinates, then noon weather
///
/// # Errors
///
/// Returns a `Storage` error if writing fails.
pub fn write_catch_table<W: io::Write>(writer: W, table: &CatchTable) -> Result<(), ApplicationError> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    writer
        .write_record(output_headers(table))
        .map_err(|e| csv_error(&e))?;

    for record in &table.records {
        let coordinates = record.coordinates.map_or([None, None], |c| {
            [Some(c.latitude()), Some(c.longitude())]
        });
        let weather = record.weather.map(|w| w.values()).unwrap_or_default();

        let row = record
            .fields
            .iter()
            .cloned()
            .chain(coordinates.into_iter().map(format_value))
            .chain(weather.into_iter().map(format_value));
        writer.write_record(row).map_err(|e| csv_error(&e))?;
    }

    writer
        .flush()
        .map_err(|e| ApplicationError::Storage(format!("CSV flush error: {e}")))
}

/// Write the enriched table to a file
///
/// # Errors
///
/// Returns a `Storage` error if the file cannot be created or written.
#[instrument(skip(table), fields(path = %path.display(), records = table.len()))]
pub fn write_catch_table_to_path(path: &Path, table: &CatchTable) -> Result<(), ApplicationError> {
    let file = std::fs::File::create(path)
        .map_err(|e| ApplicationError::Storage(format!("Cannot create {}: {e}", path.display())))?;
    write_catch_table(io::BufWriter::new(file), table)?;
    info!("Wrote enriched table");
    Ok(())
}
