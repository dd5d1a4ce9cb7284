// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading and saving
//! settings to a `settings.toml` file.
//!
//! # Examples
//!
//! ```no_run
//! use session_shell::config::{self, Config};
//!
//! // Load existing configuration (defaults when there is none)
//! let mut config = config::load().unwrap_or_default();
//!
//! // Modify a setting
//! config.max_visible_alerts = Some(5);
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

use crate::domain::diagnostics::BufferCapacity;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use defaults::{DEFAULT_MAX_VISIBLE_ALERTS, DEFAULT_USERS_COLLECTION};

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "SessionShell";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Backend collection holding user documents.
    #[serde(default)]
    pub users_collection: Option<String>,
    #[serde(default)]
    pub max_visible_alerts: Option<usize>,
    #[serde(default)]
    pub diagnostics_buffer_capacity: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            users_collection: Some(DEFAULT_USERS_COLLECTION.to_string()),
            max_visible_alerts: Some(DEFAULT_MAX_VISIBLE_ALERTS),
            diagnostics_buffer_capacity: None,
        }
    }
}

impl Config {
    /// Collection name, falling back to the default when unset or blank.
    #[must_use]
    pub fn users_collection(&self) -> &str {
        self.users_collection
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_USERS_COLLECTION)
    }

    /// Visible alert count, clamped to `1..=MAX_VISIBLE_ALERTS_LIMIT`.
    #[must_use]
    pub fn max_visible_alerts(&self) -> usize {
        self.max_visible_alerts
            .unwrap_or(DEFAULT_MAX_VISIBLE_ALERTS)
            .clamp(1, defaults::MAX_VISIBLE_ALERTS_LIMIT)
    }

    #[must_use]
    pub fn diagnostics_capacity(&self) -> BufferCapacity {
        BufferCapacity::from_setting(self.diagnostics_buffer_capacity)
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

/// Loads the configuration from the platform config directory.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

/// Saves the configuration to the platform config directory.
///
/// # Errors
///
/// Returns an error if the file cannot be serialized or written.
pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Loads a configuration file; unparsable content yields the defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "invalid settings file, using defaults");
            Ok(Config::default())
        }
    }
}

/// Writes a configuration file, creating parent directories.
///
/// # Errors
///
/// Returns an error if serialization or any filesystem operation fails.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
