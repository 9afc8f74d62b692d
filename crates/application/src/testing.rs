//! In-memory test doubles shared by service tests

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::ApplicationError;
use crate::ports::SnapshotStore;

/// Snapshot store that keeps the last saved mapping in memory
#[derive(Debug)]
pub struct MemorySnapshotStore<K, V> {
    entries: Mutex<HashMap<K, V>>,
    saves: AtomicUsize,
    fail_saves: bool,
}

impl<K, V> MemorySnapshotStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self::with_entries(HashMap::new())
    }

    pub fn with_entries(entries: HashMap<K, V>) -> Self {
        Self {
            entries: Mutex::new(entries),
            saves: AtomicUsize::new(0),
            fail_saves: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::new()
        }
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> HashMap<K, V> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl<K, V> SnapshotStore<K, V> for MemorySnapshotStore<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + std::fmt::Debug,
    V: Clone + Send + Sync + std::fmt::Debug,
{
    async fn load(&self) -> Result<HashMap<K, V>, ApplicationError> {
        Ok(self.snapshot())
    }

    async fn save(&self, entries: &HashMap<K, V>) -> Result<(), ApplicationError> {
        if self.fail_saves {
            return Err(ApplicationError::Storage("memory store is read-only".into()));
        }
        *self.entries.lock().unwrap() = entries.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
