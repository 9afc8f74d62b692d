//! Disk-backed key-value cache
//!
//! The cache keeps the whole mapping in memory and rewrites the snapshot
//! wholesale through a [`SnapshotStore`]. Callers decide when to flush; the
//! cache only tracks how many fetched entries were added since the last flush
//! and whether anything at all changed.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use domain::value_objects::{GeoLocation, NoonWeather, WeatherKey};
use tracing::debug;

use crate::error::ApplicationError;
use crate::ports::SnapshotStore;

/// Default number of new entries between periodic flushes
pub const DEFAULT_FLUSH_INTERVAL: usize = 10;

/// Location name to coordinates; `None` marks a name the geocoder could not resolve
pub type GeocodeCache = PersistentCache<String, Option<GeoLocation>>;

/// Coordinates and date to the noon weather fields
pub type WeatherCache = PersistentCache<WeatherKey, NoonWeather>;

/// In-memory mapping backed by a snapshot store
pub struct PersistentCache<K, V> {
    store: Arc<dyn SnapshotStore<K, V>>,
    entries: HashMap<K, V>,
    pending: usize,
    unsaved: bool,
    flush_interval: usize,
}

impl<K, V> fmt::Debug for PersistentCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentCache")
            .field("store", &self.store)
            .field("entries", &self.entries.len())
            .field("pending", &self.pending)
            .field("unsaved", &self.unsaved)
            .field("flush_interval", &self.flush_interval)
            .finish()
    }
}

impl<K, V> PersistentCache<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Send + Sync,
{
    /// Load the full mapping from `store`
    ///
    /// A `flush_interval` of zero is treated as one.
    pub async fn open(
        store: Arc<dyn SnapshotStore<K, V>>,
        flush_interval: usize,
    ) -> Result<Self, ApplicationError> {
        let entries = store.load().await?;
        debug!(
            location = %store.location(),
            entries = entries.len(),
            "Loaded cache snapshot"
        );
        Ok(Self {
            store,
            entries,
            pending: 0,
            unsaved: false,
            flush_interval: flush_interval.max(1),
        })
    }

    /// Look up a cached value
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Whether `key` has a cached value (including a sentinel)
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Store a value and report whether a periodic flush is due
    ///
    /// Overwriting an existing key does not count as a new entry.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        if self.entries.insert(key, value).is_none() {
            self.pending += 1;
        }
        self.unsaved = true;
        self.pending >= self.flush_interval
    }

    /// Store a known-failure marker
    ///
    /// The entry is written by the next flush but never counts toward the
    /// periodic flush interval.
    pub fn insert_sentinel(&mut self, key: K, value: V) {
        self.entries.insert(key, value);
        self.unsaved = true;
    }

    /// Rewrite the snapshot with the current mapping
    ///
    /// On failure the pending state is kept, so the next flush retries.
    pub async fn flush(&mut self) -> Result<(), ApplicationError> {
        self.store.save(&self.entries).await?;
        debug!(
            location = %self.store.location(),
            entries = self.entries.len(),
            "Flushed cache snapshot"
        );
        self.pending = 0;
        self.unsaved = false;
        Ok(())
    }

    /// Number of cached entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries added since the last successful flush
    #[must_use]
    pub const fn pending(&self) -> usize {
        self.pending
    }

    /// Whether the mapping changed since the last successful flush
    #[must_use]
    pub const fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Where the snapshot lives
    #[must_use]
    pub fn location(&self) -> String {
        self.store.location()
    }

    /// Iterate over all cached entries
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }
}
