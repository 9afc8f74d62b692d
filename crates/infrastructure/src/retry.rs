//! Retry with exponential backoff
//!
//! Both HTTP adapters wrap their client calls in [`with_retry`]. Only errors
//! that report themselves as transient through [`Retryable`] are retried, so a
//! geocoder miss or a malformed request fails on the first attempt.

use std::future::Future;
use std::time::{Duration, Instant};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Backoff schedule for transient failures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Delay before the first retry in milliseconds (default: 200)
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,

    /// Upper bound for any single delay in milliseconds (default: 10000)
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,

    /// Growth factor between consecutive delays (default: 2.0)
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    /// Retries after the first attempt (default: 5)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Randomize each delay by up to `jitter_factor` (default: true)
    #[serde(default = "default_jitter_enabled")]
    pub jitter_enabled: bool,

    /// Relative jitter amplitude, 0.0 to 1.0 (default: 0.1)
    #[serde(default = "default_jitter_factor")]
    pub jitter_factor: f64,
}

const fn default_initial_delay() -> u64 {
    200
}

const fn default_max_delay() -> u64 {
    10_000
}

const fn default_multiplier() -> f64 {
    2.0
}

const fn default_max_retries() -> u32 {
    5
}

const fn default_jitter_enabled() -> bool {
    true
}

const fn default_jitter_factor() -> f64 {
    0.1
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new(
            default_initial_delay(),
            default_max_delay(),
            default_multiplier(),
            default_max_retries(),
        )
    }
}

impl RetryConfig {
    /// Schedule with default jitter
    #[must_use]
    pub const fn new(
        initial_delay_ms: u64,
        max_delay_ms: u64,
        multiplier: f64,
        max_retries: u32,
    ) -> Self {
        Self {
            initial_delay_ms,
            max_delay_ms,
            multiplier,
            max_retries,
            jitter_enabled: default_jitter_enabled(),
            jitter_factor: default_jitter_factor(),
        }
    }

    /// A single attempt, no waiting
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            initial_delay_ms: 0,
            max_delay_ms: 0,
            multiplier: 1.0,
            max_retries: 0,
            jitter_enabled: false,
            jitter_factor: 0.0,
        }
    }

    /// Same schedule with deterministic delays
    #[must_use]
    pub const fn without_jitter(mut self) -> Self {
        self.jitter_enabled = false;
        self
    }

    /// Delay before retry number `retry` (0 for the first retry)
    ///
    /// `initial_delay_ms * multiplier^retry`, capped at `max_delay_ms`, then
    /// jittered.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    pub fn delay_for_attempt(&self, retry: u32) -> Duration {
        let exponent = retry.min(i32::MAX as u32) as i32;
        let raw = self.initial_delay_ms as f64 * self.multiplier.powi(exponent);
        let capped = raw.min(self.max_delay_ms as f64);

        let millis = if self.jitter_enabled && capped > 0.0 {
            let spread = capped * self.jitter_factor;
            (capped + rand::rng().random_range(-spread..=spread)).max(0.0)
        } else {
            capped
        };
        Duration::from_millis(millis as u64)
    }
}

/// Errors that know whether another attempt could succeed
pub trait Retryable {
    /// Whether the failure is transient
    fn is_retryable(&self) -> bool;
}

impl Retryable for application::ApplicationError {
    fn is_retryable(&self) -> bool {
        Self::is_retryable(self)
    }
}

impl Retryable for integration_geocoding::GeocodingError {
    fn is_retryable(&self) -> bool {
        Self::is_retryable(self)
    }
}

impl Retryable for integration_weather::WeatherError {
    fn is_retryable(&self) -> bool {
        Self::is_retryable(self)
    }
}

/// Final outcome of a retried operation
#[derive(Debug)]
pub struct RetryResult<T, E> {
    /// Last result produced by the operation
    pub result: Result<T, E>,
    /// Attempts made, including the first
    pub attempts: u32,
    /// Wall time including backoff sleeps
    pub total_duration: Duration,
}

impl<T, E> RetryResult<T, E> {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    #[must_use]
    pub const fn is_err(&self) -> bool {
        self.result.is_err()
    }

    pub fn into_result(self) -> Result<T, E> {
        self.result
    }
}

/// Run `operation` until it succeeds, fails permanently or runs out of retries
pub async fn with_retry<F, Fut, T, E>(config: &RetryConfig, mut operation: F) -> RetryResult<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    let started = Instant::now();
    let mut retries = 0u32;

    let result = loop {
        match operation().await {
            Ok(value) => break Ok(value),
            Err(err) if !err.is_retryable() => {
                debug!(attempt = retries + 1, error = %err, "Permanent failure, not retrying");
                break Err(err);
            },
            Err(err) if retries >= config.max_retries => {
                warn!(attempts = retries + 1, error = %err, "Giving up after retries");
                break Err(err);
            },
            Err(err) => {
                let delay = config.delay_for_attempt(retries);
                warn!(
                    attempt = retries + 1,
                    max_retries = config.max_retries,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "Transient failure, backing off"
                );
                tokio::time::sleep(delay).await;
                retries += 1;
            },
        }
    };

    RetryResult {
        result,
        attempts: retries + 1,
        total_duration: started.elapsed(),
    }
}

/// [`with_retry`] without the attempt metadata
pub async fn retry<F, Fut, T, E>(config: &RetryConfig, operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    with_retry(config, operation).await.into_result()
}
