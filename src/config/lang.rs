// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! User-facing strings.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Table of localized UI strings.
///
/// The language file is a JSON object keyed by language code; each entry may
/// omit keys, which then keep their English text:
///
/// ```json
/// { "de": { "online": "ONLINE", "offline": "OFFLINE", "turn_on": "EIN" } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Translations {
    /// Application title.
    pub window_title: String,
    /// Label before the connection status.
    pub status: String,
    /// Label before the output state.
    pub output_state: String,
    /// Label before the device address.
    pub device: String,
    /// Label before the relay index.
    pub output: String,
    /// Output state ON.
    pub on: String,
    /// Output state OFF.
    pub off: String,
    /// Output state while the device is unreachable.
    pub unknown: String,
    /// Caption of the switch-on control.
    pub turn_on: String,
    /// Caption of the switch-off control.
    pub turn_off: String,
    /// Caption of the toggle control.
    pub toggle: String,
    /// Status while the device answers.
    pub online: String,
    /// Status while the device does not answer.
    pub offline: String,
    /// Heading for configuration problems.
    pub config_error: String,
    /// Heading for connection problems.
    pub connection_error: String,
    /// Heading for a failed command.
    pub command_failed: String,
    /// Label before the logging status.
    pub logging: String,
    /// Logging status when the event log is written.
    pub enabled: String,
    /// Logging status when it is not.
    pub disabled: String,
    /// Label before the time of the last answer.
    pub last_update: String,
}

impl Default for Translations {
    fn default() -> Self {
        Self {
            window_title: "Tasmota Controller".to_string(),
            status: "Status:".to_string(),
            output_state: "Output State:".to_string(),
            device: "Device:".to_string(),
            output: "Output:".to_string(),
            on: "ON".to_string(),
            off: "OFF".to_string(),
            unknown: "UNKNOWN".to_string(),
            turn_on: "TURN ON".to_string(),
            turn_off: "TURN OFF".to_string(),
            toggle: "TOGGLE".to_string(),
            online: "ONLINE".to_string(),
            offline: "OFFLINE".to_string(),
            config_error: "Configuration Error".to_string(),
            connection_error: "Connection Error".to_string(),
            command_failed: "Command Failed".to_string(),
            logging: "Logging:".to_string(),
            enabled: "ENABLED".to_string(),
            disabled: "DISABLED".to_string(),
            last_update: "Last update:".to_string(),
        }
    }
}

impl Translations {
    /// Loads the table for `language` from a language file.
    ///
    /// A file without an entry for `language` yields the built-in English
    /// table.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>, language: &str) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        let mut tables: HashMap<String, Self> = serde_json::from_str(&contents)?;
        Ok(tables.remove(language).unwrap_or_else(|| {
            tracing::info!(language, "Language not in language file, using English");
            Self::default()
        }))
    }

    /// Like [`load`](Self::load), but falls back to English on error and
    /// hands the error back for reporting.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>, language: &str) -> (Self, Option<ConfigError>) {
        match Self::load(path, language) {
            Ok(table) => (table, None),
            Err(e) => {
                tracing::warn!("Language file error, using English: {e}");
                (Self::default(), Some(e))
            }
        }
    }
}
