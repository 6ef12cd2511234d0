//! Engine configuration: capacities, schema width, poll cadence and theme.
//!
//! Everything here is fixed at startup and validated before the engine is
//! built. Capacities are construction-time parameters with declared bounds,
//! not compile-time constants.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Hard upper bound on the number of value fields per record.
pub const MAX_FIELDS: usize = 8;

/// Default ring capacity in samples.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Smallest accepted line-assembly buffer, in bytes.
pub const MIN_LINE_CAPACITY: usize = 256;

/// Default line-assembly buffer, in bytes.
pub const DEFAULT_LINE_CAPACITY: usize = 512;

/// Default producer sleep while the device is quiet, in milliseconds.
pub const DEFAULT_POLL_MS: u64 = 10;

/// Default margin around the plot area, in pixels.
pub const DEFAULT_MARGIN: f32 = 50.0;

// ─────────────────────────────────────────────────────────────────────────────
// Theme
// ─────────────────────────────────────────────────────────────────────────────

/// Visual theme selector for rendered frames.
///
/// Background and axis colors live in [`crate::render`]; the trace palette is
/// shared by both themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Dark
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ScopeConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Everything the engine needs to run, fixed for the process lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Number of value fields per record, in `[1, MAX_FIELDS]`.
    pub field_count: usize,
    /// Ring capacity in samples; at least 1, typically 100–2048.
    pub capacity: usize,
    /// Producer sleep while the device has no data, in milliseconds.
    /// This is a tunable, and also the upper bound on shutdown latency.
    pub poll_interval_ms: u64,
    /// Line-assembly buffer capacity in bytes; a line longer than this
    /// without a terminator is dropped. At least `MIN_LINE_CAPACITY`.
    pub line_capacity: usize,
    /// Margin around the plot area, in pixels.
    pub margin: f32,
    /// Visual theme.
    pub theme: Theme,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            field_count: 1,
            capacity: DEFAULT_CAPACITY,
            poll_interval_ms: DEFAULT_POLL_MS,
            line_capacity: DEFAULT_LINE_CAPACITY,
            margin: DEFAULT_MARGIN,
            theme: Theme::default(),
        }
    }
}

/// Invalid startup configuration. Always fatal: the engine refuses to build.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("field count {0} outside [1, 8]")]
    FieldCount(usize),
    #[error("ring capacity must be at least 1")]
    Capacity,
    #[error("line buffer capacity {0} below minimum 256")]
    LineCapacity(usize),
    #[error("poll interval must be non-zero")]
    PollInterval,
    #[error("cannot read config file: {0}")]
    Read(String),
    #[error("cannot parse config file: {0}")]
    Parse(String),
}

impl ScopeConfig {
    /// Check every declared invariant; `Err` means the process should exit
    /// before entering its main loop.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.field_count < 1 || self.field_count > MAX_FIELDS {
            return Err(ConfigError::FieldCount(self.field_count));
        }
        if self.capacity < 1 {
            return Err(ConfigError::Capacity);
        }
        if self.line_capacity < MIN_LINE_CAPACITY {
            return Err(ConfigError::LineCapacity(self.line_capacity));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::PollInterval);
        }
        Ok(())
    }

    /// The quiet-device backoff as a `Duration`.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Load a config from a JSON file. The result is not yet validated;
    /// callers go through [`ScopeConfig::validate`] (or `TelemetryScope::new`)
    /// as with any other config.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Read(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
