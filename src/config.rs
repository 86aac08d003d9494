//! Runtime configuration for the `mousekit` binary.
//!
//! Read from `config.json` in the user's config directory
//! (`%APPDATA%\mousekit` on Windows), or from the file named by
//! `MOUSEKIT_CONFIG`. Missing files and missing fields fall back to
//! defaults.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "MOUSEKIT_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How often the status task runs, in hertz.
    pub status_hz: u32,

    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Whether the status task logs the last cursor move.
    pub log_moves: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            status_hz: 1,
            log_filter: "mousekit=info".to_string(),
            log_moves: false,
        }
    }
}

impl Config {
    /// Default location of the config file, if a config directory exists.
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("mousekit").join("config.json"))
    }

    /// Parses the config at `path`.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Loads the config from [`Config::default_path`].
    ///
    /// An absent file yields the defaults; an unreadable or malformed one
    /// is an error.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "Loading config");
                Self::from_path(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}
