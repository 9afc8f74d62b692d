//! Retry configuration for the HTTP adapters.

use serde::{Deserialize, Serialize};

/// Retry configuration for external service calls
///
/// Applies to both the geocoder and the weather archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryAppConfig {
    /// Initial delay before first retry in milliseconds (default: 200ms)
    #[serde(default = "default_retry_initial_delay")]
    pub initial_delay_ms: u64,

    /// Maximum delay between retries in milliseconds (default: 10000ms = 10s)
    #[serde(default = "default_retry_max_delay")]
    pub max_delay_ms: u64,

    /// Multiplier for exponential backoff (default: 2.0)
    #[serde(default = "default_retry_multiplier")]
    pub multiplier: f64,

    /// Maximum number of retry attempts (default: 5)
    #[serde(default = "default_retry_max_retries")]
    pub max_retries: u32,
}

const fn default_retry_initial_delay() -> u64 {
    200
}

const fn default_retry_max_delay() -> u64 {
    10_000
}

const fn default_retry_multiplier() -> f64 {
    2.0
}

const fn default_retry_max_retries() -> u32 {
    5
}

impl Default for RetryAppConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_retry_initial_delay(),
            max_delay_ms: default_retry_max_delay(),
            multiplier: default_retry_multiplier(),
            max_retries: default_retry_max_retries(),
        }
    }
}

impl RetryAppConfig {
    /// Convert to `retry::RetryConfig` for use with retry operations
    #[must_use]
    pub const fn to_retry_config(&self) -> crate::retry::RetryConfig {
        crate::retry::RetryConfig::new(
            self.initial_delay_ms,
            self.max_delay_ms,
            self.multiplier,
            self.max_retries,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_retry_defaults() {
        let app = RetryAppConfig::default();
        let retry = app.to_retry_config();

        assert_eq!(retry.initial_delay_ms, 200);
        assert_eq!(retry.max_delay_ms, 10_000);
        assert!((retry.multiplier - 2.0).abs() < f64::EPSILON);
        assert_eq!(retry.max_retries, 5);
        assert!(retry.jitter_enabled);
    }

    #[test]
    fn partial_section_fills_defaults() {
        let app: RetryAppConfig = serde_json::from_str(r#"{"max_retries": 1}"#).unwrap();
        assert_eq!(app.max_retries, 1);
        assert_eq!(app.initial_delay_ms, 200);
    }
}
