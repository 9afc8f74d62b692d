//! Cache file locations and flush cadence.

use std::path::{Path, PathBuf};

use application::services::DEFAULT_FLUSH_INTERVAL;
use serde::{Deserialize, Serialize};

/// Default geocode snapshot file name
pub const GEOCODE_CACHE_FILE: &str = "geocode_cache.bin";

/// Default weather snapshot file name
pub const WEATHER_CACHE_FILE: &str = "weather_cache.bin";

/// Where the two cache snapshots live and how often they are rewritten
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Geocode snapshot path (default: `geocode_cache.bin` next to the input)
    #[serde(default)]
    pub geocode_path: Option<PathBuf>,

    /// Weather snapshot path (default: `weather_cache.bin` next to the input)
    #[serde(default)]
    pub weather_path: Option<PathBuf>,

    /// New entries between periodic flushes (default: 10)
    #[serde(default = "default_flush_interval")]
    pub flush_interval: usize,
}

const fn default_flush_interval() -> usize {
    DEFAULT_FLUSH_INTERVAL
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            geocode_path: None,
            weather_path: None,
            flush_interval: default_flush_interval(),
        }
    }
}

impl CacheConfig {
    /// Geocode snapshot path for a run over `input`
    #[must_use]
    pub fn geocode_path_for(&self, input: &Path) -> PathBuf {
        self.geocode_path
            .clone()
            .unwrap_or_else(|| sibling(input, GEOCODE_CACHE_FILE))
    }

    /// Weather snapshot path for a run over `input`
    #[must_use]
    pub fn weather_path_for(&self, input: &Path) -> PathBuf {
        self.weather_path
            .clone()
            .unwrap_or_else(|| sibling(input, WEATHER_CACHE_FILE))
    }
}

fn sibling(input: &Path, file_name: &str) -> PathBuf {
    input
        .parent()
        .map_or_else(|| PathBuf::from(file_name), |dir| dir.join(file_name))
}
