//! Config loading for solis.
//!
//! Loads and validates the YAML config file with path expansion.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::error::ConfigError;
use crate::config::types::{Config, RawConfig};

/// Expand tilde in path to home directory.
///
/// Handles the following cases:
/// - `~/foo` -> `/home/user/foo`
/// - `/absolute/path` -> unchanged
/// - `relative/path` -> unchanged
pub fn expand_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();

    if let Some(rest) = path_str.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path_str == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }

    path.to_path_buf()
}

/// Default config location: ~/.config/solis/config.yaml
pub fn default_config_path() -> Option<PathBuf> {
    crate::prefs::solis_dir().map(|p| p.join("config.yaml"))
}

/// Parse config text. `path` is only used for error messages.
pub fn parse(content: &str, path: &Path) -> Result<Config, ConfigError> {
    let raw: RawConfig = if content.trim().is_empty() {
        RawConfig::default()
    } else {
        serde_saphyr::from_str(content)
            .map_err(|e| ConfigError::from_parse_message(path.to_path_buf(), e.to_string()))?
    };
    validate(raw, path)
}

/// Apply defaults and check values.
fn validate(raw: RawConfig, path: &Path) -> Result<Config, ConfigError> {
    let mut config = Config::default();

    if let Some(conn) = raw.connection {
        if let Some(address) = conn.address {
            if address.trim().is_empty() {
                return Err(ConfigError::Validation {
                    path: path.to_path_buf(),
                    message: "connection.address must not be empty".to_string(),
                });
            }
            config.address = address.trim().to_string();
        }
        if let Some(port) = conn.port {
            config.port = port;
        }
        config.auto_connect = conn.auto_connect.unwrap_or(false);
    }

    if let Some(ingest) = raw.ingest {
        if let Some(ms) = ingest.flush_interval_ms {
            if ms == 0 {
                return Err(ConfigError::Validation {
                    path: path.to_path_buf(),
                    message: "ingest.flush_interval_ms must be greater than 0".to_string(),
                });
            }
            config.flush_interval_ms = ms;
        }
    }

    config.log_file = raw.log_file.as_deref().map(expand_path);
    Ok(config)
}

/// Load and validate a config file.
pub fn load_file(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse(&content, path)
}

/// Load the config the user asked for, or the default one if it exists.
///
/// An explicit path must load cleanly. The default path is optional: if it is
/// missing the defaults are used, and if it is broken the error is returned
/// alongside the defaults so the caller can report it and carry on.
pub fn load(explicit: Option<&Path>) -> Result<(Config, Option<ConfigError>), ConfigError> {
    if let Some(path) = explicit {
        return load_file(&expand_path(path)).map(|c| (c, None));
    }

    let Some(path) = default_config_path() else {
        return Ok((Config::default(), None));
    };
    if !path.exists() {
        return Ok((Config::default(), None));
    }

    match load_file(&path) {
        Ok(config) => Ok((config, None)),
        Err(e) => Ok((Config::default(), Some(e))),
    }
}
