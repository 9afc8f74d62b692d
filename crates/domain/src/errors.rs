//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Coordinates outside the valid latitude/longitude range
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    /// Date could not be parsed from the raw record value
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Hourly series too short to pick the requested sample
    #[error("Insufficient hourly data: {available} samples, need at least {required}")]
    InsufficientData { available: usize, required: usize },

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Create an insufficient data error
    #[must_use]
    pub const fn insufficient_data(available: usize, required: usize) -> Self {
        Self::InsufficientData {
            available,
            required,
        }
    }
}
