//! Domain layer for catch-weather
//!
//! Contains the catch records, coordinates, composite weather keys and the
//! noon weather snapshot that the enrichment pipeline works with.
//! This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
