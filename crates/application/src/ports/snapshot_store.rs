//! Cache snapshot port
//!
//! A snapshot store persists a whole key-value mapping at once. There are no
//! partial writes: `save` replaces the previous snapshot entirely.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;

use crate::error::ApplicationError;

/// Port for loading and saving a complete cache mapping
#[async_trait]
pub trait SnapshotStore<K, V>: Send + Sync + fmt::Debug {
    /// Load the stored mapping; an absent snapshot yields an empty mapping
    async fn load(&self) -> Result<HashMap<K, V>, ApplicationError>;

    /// Replace the stored snapshot with `entries`
    async fn save(&self, entries: &HashMap<K, V>) -> Result<(), ApplicationError>;

    /// Human-readable location of the snapshot, used in log output
    fn location(&self) -> String;
}
