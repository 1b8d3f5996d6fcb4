//! Small key-value cache for audio device preferences.
//!
//! Stored as a flat JSON object under the solis config directory. Anything
//! missing, unreadable, or of the wrong shape reads back as the default value.

use crate::host::DEFAULT_DEVICE;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const SELECTED_INPUT_DEVICE: &str = "selectedInputDevice";
pub const SELECTED_OUTPUT_DEVICE: &str = "selectedOutputDevice";
pub const INPUT_DEVICES: &str = "inputDevices";
pub const OUTPUT_DEVICES: &str = "outputDevices";

/// Get the solis config directory: ~/.config/solis/
pub fn solis_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".config").join("solis"))
}

/// Get the preferences file path
pub fn prefs_file_path() -> Option<PathBuf> {
    solis_dir().map(|p| p.join("prefs.json"))
}

/// Persisted preferences, written through on every change.
#[derive(Debug, Default)]
pub struct Prefs {
    path: Option<PathBuf>,
    values: Map<String, Value>,
}

impl Prefs {
    /// In-memory preferences that are never written anywhere.
    pub fn ephemeral() -> Self {
        Self::default()
    }

    /// Load from `path`. A missing or malformed file yields empty preferences.
    pub fn load_from(path: &Path) -> Self {
        Self {
            path: Some(path.to_path_buf()),
            values: read_map(path),
        }
    }

    /// Load from the default location, or fall back to in-memory preferences.
    pub fn load_default() -> Self {
        match prefs_file_path() {
            Some(path) => Self::load_from(&path),
            None => Self::ephemeral(),
        }
    }

    /// String value for `key`, or `"Default"`.
    pub fn get_string(&self, key: &str) -> String {
        match self.values.get(key) {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => DEFAULT_DEVICE.to_string(),
        }
    }

    /// List value for `key`, or `["Default"]`. Non-string entries are ignored.
    pub fn get_list(&self, key: &str) -> Vec<String> {
        let list: Vec<String> = match self.values.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        };
        if list.is_empty() {
            vec![DEFAULT_DEVICE.to_string()]
        } else {
            list
        }
    }

    pub fn set_string(&mut self, key: &str, value: &str) {
        if self.values.get(key).and_then(Value::as_str) == Some(value) {
            return;
        }
        self.values
            .insert(key.to_string(), Value::String(value.to_string()));
        self.save();
    }

    pub fn set_list(&mut self, key: &str, values: &[String]) {
        let new_value = Value::Array(values.iter().cloned().map(Value::String).collect());
        if self.values.get(key) == Some(&new_value) {
            return;
        }
        self.values.insert(key.to_string(), new_value);
        self.save();
    }

    fn save(&self) {
        if let Some(path) = &self.path {
            save_to(path, &self.values);
        }
    }
}

fn read_map(path: &Path) -> Map<String, Value> {
    if !path.exists() {
        return Map::new();
    }

    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                warn!(path = %path.display(), "preferences file is not a JSON object, ignoring");
                Map::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to parse preferences");
                Map::new()
            }
        },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read preferences");
            Map::new()
        }
    }
}

fn save_to(path: &Path, values: &Map<String, Value>) {
    // Create parent directory if it doesn't exist
    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!(error = %e, "failed to create config directory");
            return;
        }
    }

    match serde_json::to_string_pretty(values) {
        Ok(content) => {
            if let Err(e) = fs::write(path, content) {
                warn!(path = %path.display(), error = %e, "failed to save preferences");
            }
        }
        Err(e) => warn!(error = %e, "failed to serialize preferences"),
    }
}
