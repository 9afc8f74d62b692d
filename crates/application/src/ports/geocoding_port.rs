//! Geocoding service port
//!
//! Resolves free-form location names to coordinates.

use async_trait::async_trait;
use domain::value_objects::GeoLocation;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for name-to-coordinate lookups
///
/// Implementations are responsible for honoring the provider's rate limit.
/// A definite "no result" must be reported as [`ApplicationError::NotFound`] so
/// callers can tell it apart from transient failures.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Resolve a location name to coordinates
    async fn geocode(&self, name: &str) -> Result<GeoLocation, ApplicationError>;
}
