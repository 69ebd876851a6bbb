//! # Form Settings
//!
//! Timing and endpoint configuration shared by the GUI and CLI shells.
//! Settings are stored as JSON; every field has a default so partial files
//! work. `BRIDGE_SERVER_URL` overrides the server URL from the file.
//!
//! ```rust
//! use bridge_core::settings::FormSettings;
//!
//! let settings: FormSettings = serde_json::from_str(r#"{"debounce_ms": 250}"#).unwrap();
//! assert_eq!(settings.debounce_ms, 250);
//! assert_eq!(settings.toast_ms, 5000);
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{BridgeError, BridgeResult};

/// Environment variable overriding [`FormSettings::server_url`]
pub const SERVER_URL_ENV: &str = "BRIDGE_SERVER_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSettings {
    /// Base URL of the drawing server (validation and generation endpoints)
    pub server_url: String,

    /// Quiet period after the last keystroke before a field is checked
    pub debounce_ms: u64,

    /// How long a toast stays on screen
    pub toast_ms: u64,

    /// Timeout for validation and generation requests
    pub request_timeout_secs: u64,

    /// File used as the clipboard by the terminal front end
    pub clipboard_path: PathBuf,
}

impl Default for FormSettings {
    fn default() -> Self {
        FormSettings {
            server_url: "http://127.0.0.1:5000".to_string(),
            debounce_ms: 500,
            toast_ms: 5000,
            request_timeout_secs: 30,
            clipboard_path: PathBuf::from("bridge_clipboard.json"),
        }
    }
}

impl FormSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn toast_lifetime(&self) -> Duration {
        Duration::from_millis(self.toast_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Apply `BRIDGE_SERVER_URL` if it is set and not blank
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            if !url.trim().is_empty() {
                self.server_url = url.trim().to_string();
            }
        }
        self
    }
}

/// Load settings from a JSON file.
///
/// # Returns
///
/// * `Ok(FormSettings)` - Parsed settings, missing keys defaulted
/// * `Err(BridgeError::FileError)` - File could not be read
/// * `Err(BridgeError::SerializationError)` - Invalid JSON
pub fn load_settings(path: &Path) -> BridgeResult<FormSettings> {
    let contents = fs::read_to_string(path)
        .map_err(|e| BridgeError::file_error("read", path.display().to_string(), e.to_string()))?;

    serde_json::from_str(&contents).map_err(|e| BridgeError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })
}

/// Load settings from `path` when given, else defaults; then apply the environment
pub fn resolve_settings(path: Option<&Path>) -> BridgeResult<FormSettings> {
    let settings = match path {
        Some(path) => load_settings(path)?,
        None => FormSettings::default(),
    };
    Ok(settings.with_env_overrides())
}
