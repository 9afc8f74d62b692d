//! Application layer - Use cases and orchestration
//!
//! Contains the port definitions for geocoding, weather archives and cache
//! snapshots, plus the enrichment pipeline that drives them.

pub mod error;
pub mod ports;
pub mod services;
#[cfg(test)]
pub(crate) mod testing;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
