//! Logging configuration
//!
//! Controls the engine's internal `tracing` output. The subscriber is
//! installed by the embedding binary; this crate only carries the knobs.

use serde::Deserialize;

/// Log level
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Very verbose, per-record events
    Trace,
    /// Fusion decisions and flushes
    Debug,
    /// Normal operation (default)
    #[default]
    Info,
    /// Malformed records and backpressure
    Warn,
    /// Errors only
    Error,
}

impl LogLevel {
    /// The tracing level-filter directive for this level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console output (default)
    #[default]
    Console,
    /// JSON structured logging
    Json,
}

/// Logging configuration
///
/// ```toml
/// [log]
/// level = "debug"
/// format = "json"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error). Default: info
    pub level: LogLevel,

    /// Output format (console, json). Default: console
    pub format: LogFormat,
}
