//! Parsing of the raw date representations found in catch exports
//!
//! Exports carry either a single `MM/DD/YYYY` column or separate
//! month-name / day / year columns. Both are normalized to a `NaiveDate`.

use chrono::NaiveDate;

use crate::errors::DomainError;

/// Accepted formats for a single date cell, tried in order
const DATE_FORMATS: [&str; 2] = ["%m/%d/%Y", "%Y-%m-%d"];

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Parse a single date cell (`MM/DD/YYYY`, or ISO `YYYY-MM-DD`)
///
/// # Errors
///
/// Returns `DomainError::InvalidDate` when no accepted format matches.
pub fn parse_date(raw: &str) -> Result<NaiveDate, DomainError> {
    let trimmed = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| DomainError::InvalidDate(trimmed.to_string()))
}

/// Build a date from an English month name plus day and year cells
///
/// # Errors
///
/// Returns `DomainError::InvalidDate` for unknown month names, non-numeric
/// day/year values or impossible dates such as February 30th.
pub fn date_from_parts(month: &str, day: &str, year: &str) -> Result<NaiveDate, DomainError> {
    let invalid = || DomainError::InvalidDate(format!("{} {} {}", month.trim(), day.trim(), year.trim()));

    let month_number = month_number(month).ok_or_else(invalid)?;
    let day: u32 = day.trim().parse().map_err(|_| invalid())?;
    let year: i32 = year.trim().parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month_number, day).ok_or_else(invalid)
}

/// Month number (1-12) for a full English month name, case-insensitive
#[must_use]
pub fn month_number(name: &str) -> Option<u32> {
    let name = name.trim().to_lowercase();
    MONTH_NAMES
        .iter()
        .position(|candidate| *candidate == name)
        .and_then(|index| u32::try_from(index + 1).ok())
}
