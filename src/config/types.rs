//! Config types for solis.
//!
//! Defines structures for parsing and representing the configuration file.

use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 20777;
pub const DEFAULT_FLUSH_INTERVAL_MS: u64 = 25;

/// Raw config file structure (used for parsing).
///
/// This struct directly mirrors the YAML config file structure.
/// Unknown fields are rejected with an error.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    /// Telemetry socket settings.
    #[serde(default)]
    pub connection: Option<RawConnection>,
    /// Batch delivery settings.
    #[serde(default)]
    pub ingest: Option<RawIngest>,
    /// Log file path (may contain tilde).
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConnection {
    pub address: Option<String>,
    pub port: Option<u16>,
    pub auto_connect: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawIngest {
    pub flush_interval_ms: Option<u64>,
}

/// Validated config with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub address: String,
    pub port: u16,
    /// Connect to the telemetry socket on startup.
    pub auto_connect: bool,
    /// How often buffered rows are flushed as one batch.
    pub flush_interval_ms: u64,
    /// Expanded log file path, if configured.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            auto_connect: false,
            flush_interval_ms: DEFAULT_FLUSH_INTERVAL_MS,
            log_file: None,
        }
    }
}
