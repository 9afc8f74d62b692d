//! File-backed cache snapshots
//!
//! A snapshot is the complete cache mapping, written as a versioned envelope
//! `{ version, entries: [(key, value)] }`. Files ending in `.json` are written
//! as JSON, everything else as compact bincode. Writes go to a temporary file
//! in the same directory which is then renamed over the target.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use application::error::ApplicationError;
use application::ports::SnapshotStore;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Envelope version written by this build
pub const SNAPSHOT_VERSION: u32 = 1;

/// On-disk encoding of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    /// bincode 2, standard configuration
    Binary,
    /// Pretty-printed JSON
    Json,
}

impl SnapshotFormat {
    /// Pick the format from the file extension
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Binary,
        }
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a, K, V> {
    version: u32,
    entries: Vec<(&'a K, &'a V)>,
}

#[derive(Deserialize)]
struct Envelope<K, V> {
    version: u32,
    entries: Vec<(K, V)>,
}

/// Snapshot store writing one file per cache
pub struct FileSnapshotStore<K, V> {
    path: PathBuf,
    format: SnapshotFormat,
    _entries: PhantomData<fn() -> (K, V)>,
}

impl<K, V> fmt::Debug for FileSnapshotStore<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSnapshotStore")
            .field("path", &self.path)
            .field("format", &self.format)
            .finish()
    }
}

impl<K, V> FileSnapshotStore<K, V> {
    /// Store at `path`, format chosen by extension
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = SnapshotFormat::from_path(&path);
        Self {
            path,
            format,
            _entries: PhantomData,
        }
    }

    /// The snapshot file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The encoding in use
    #[must_use]
    pub const fn format(&self) -> SnapshotFormat {
        self.format
    }
}

fn storage_error(path: &Path, what: &str, e: impl fmt::Display) -> ApplicationError {
    ApplicationError::Storage(format!("{what} {}: {e}", path.display()))
}

fn decode_snapshot<K, V>(bytes: &[u8], format: SnapshotFormat) -> Result<Vec<(K, V)>, String>
where
    K: DeserializeOwned,
    V: DeserializeOwned,
{
    let envelope: Envelope<K, V> = match format {
        SnapshotFormat::Json => serde_json::from_slice(bytes).map_err(|e| e.to_string())?,
        SnapshotFormat::Binary => {
            bincode::serde::decode_from_slice(bytes, bincode::config::standard())
                .map_err(|e| e.to_string())?
                .0
        },
    };

    if envelope.version != SNAPSHOT_VERSION {
        return Err(format!(
            "unsupported snapshot version {} (expected {SNAPSHOT_VERSION})",
            envelope.version
        ));
    }
    Ok(envelope.entries)
}

fn encode_snapshot<K, V>(
    entries: &HashMap<K, V>,
    format: SnapshotFormat,
) -> Result<Vec<u8>, ApplicationError>
where
    K: Serialize,
    V: Serialize,
{
    let envelope = EnvelopeRef {
        version: SNAPSHOT_VERSION,
        entries: entries.iter().collect(),
    };
    match format {
        SnapshotFormat::Json => serde_json::to_vec_pretty(&envelope)
            .map_err(|e| ApplicationError::Storage(format!("Snapshot encode error: {e}"))),
        SnapshotFormat::Binary => {
            bincode::serde::encode_to_vec(&envelope, bincode::config::standard())
                .map_err(|e| ApplicationError::Storage(format!("Snapshot encode error: {e}")))
        },
    }
}

/// Write `bytes` to a sibling temp file, sync it and rename it over `path`
fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl<K, V> SnapshotStore<K, V> for FileSnapshotStore<K, V>
where
    K: Eq + Hash + Serialize + DeserializeOwned + Send + Sync,
    V: Serialize + DeserializeOwned + Send + Sync,
{
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<HashMap<K, V>, ApplicationError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No snapshot yet, starting empty");
                return Ok(HashMap::new());
            },
            Err(e) => return Err(storage_error(&self.path, "Failed to read", e)),
        };

        let entries = decode_snapshot(&bytes, self.format)
            .map_err(|e| storage_error(&self.path, "Failed to decode", e))?;
        Ok(entries.into_iter().collect())
    }

    #[instrument(skip(self, entries), fields(path = %self.path.display(), entries = entries.len()))]
    async fn save(&self, entries: &HashMap<K, V>) -> Result<(), ApplicationError> {
        let bytes = encode_snapshot(entries, self.format)?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || write_atomically(&path, &bytes))
            .await
            .map_err(|e| ApplicationError::Internal(format!("Task join error: {e}")))?
            .map_err(|e| storage_error(&self.path, "Failed to write", e))?;

        debug!("Snapshot written");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
