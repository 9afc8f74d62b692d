//! Logging setup
//!
//! Console logging through `tracing-subscriber`, as human-readable text or
//! one JSON object per line. Output goes to stderr so stdout stays free for
//! command results.

mod logging;

pub use logging::{LogFormat, LoggingConfig, TelemetryError, init_logging};
