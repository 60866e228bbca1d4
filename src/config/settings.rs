// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! On-disk settings file.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Contents of `config.json`.
///
/// Every key is optional; missing keys take the defaults below.
///
/// ```json
/// {
///     "device_ip": "192.168.1.100",
///     "output": 1,
///     "poll_interval": 5,
///     "username": "admin",
///     "password": "joker",
///     "logging": false,
///     "language": "en"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Host name or IP address of the device, optionally with `:port`.
    pub device_ip: String,
    /// Relay index (1-8).
    pub output: u8,
    /// Seconds between status polls, fractions allowed. Values below 1 are
    /// corrected.
    pub poll_interval: f64,
    /// Web UI user name; empty disables credentials.
    pub username: String,
    /// Web UI password; empty disables credentials.
    pub password: String,
    /// Whether to write the event log file.
    pub logging: bool,
    /// Language code looked up in the language file.
    pub language: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            device_ip: "192.168.1.100".to_string(),
            output: 1,
            poll_interval: 5.0,
            username: "admin".to_string(),
            password: "joker".to_string(),
            logging: false,
            language: "en".to_string(),
        }
    }
}

impl Settings {
    /// Loads settings from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read and
    /// `ConfigError::Json` if it does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        let settings = serde_json::from_str(&contents)?;
        tracing::info!("Loaded configuration from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Loads settings, falling back to defaults on any error.
    ///
    /// The error, if any, is handed back so the caller can report it. When
    /// the file does not exist the defaults are written to `path` so there
    /// is something to edit next time; an unreadable or malformed file is
    /// left untouched.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<ConfigError>) {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => (settings, None),
            Err(e) => {
                tracing::warn!("Using default configuration: {e}");
                let defaults = Self::default();
                if matches!(&e, ConfigError::Io(io) if io.kind() == io::ErrorKind::NotFound)
                    && let Err(save_err) = defaults.save(path)
                {
                    tracing::error!("Failed to write default configuration: {save_err}");
                }
                (defaults, Some(e))
            }
        }
    }

    /// Saves the settings as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parent directory cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        tracing::info!("Saved configuration to {}", path.display());
        Ok(())
    }
}
