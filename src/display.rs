// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Presentation of a [`Snapshot`] in the user's language.

use std::fmt;

use crate::config::Translations;
use crate::state::Snapshot;
use crate::types::OutputState;

/// Colour hint for a status field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Online, or output on.
    Green,
    /// Offline, or output off.
    Red,
    /// Output unknown.
    Gray,
}

/// Translated status fields ready to render.
///
/// # Examples
///
/// ```
/// use tasmota_panel::config::Translations;
/// use tasmota_panel::display::{StatusView, Tone};
/// use tasmota_panel::state::Snapshot;
///
/// let view = StatusView::new(&Snapshot::default(), &Translations::default());
/// assert_eq!(view.status(), "OFFLINE");
/// assert_eq!(view.status_tone(), Tone::Red);
/// assert_eq!(view.output(), "UNKNOWN");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    status_label: String,
    status: String,
    status_tone: Tone,
    output_label: String,
    output: String,
    output_tone: Tone,
    last_update_label: String,
    last_update: Option<String>,
    logging_label: String,
    logging: String,
}

impl StatusView {
    /// Builds the view for `snapshot`.
    #[must_use]
    pub fn new(snapshot: &Snapshot, lang: &Translations) -> Self {
        let (status, status_tone) = if snapshot.is_connected() {
            (&lang.online, Tone::Green)
        } else {
            (&lang.offline, Tone::Red)
        };

        let (output, output_tone) = match snapshot.output() {
            OutputState::On => (&lang.on, Tone::Green),
            OutputState::Off => (&lang.off, Tone::Red),
            OutputState::Unknown => (&lang.unknown, Tone::Gray),
        };

        let logging = if snapshot.logging_enabled() {
            &lang.enabled
        } else {
            &lang.disabled
        };

        Self {
            status_label: lang.status.clone(),
            status: status.clone(),
            status_tone,
            output_label: lang.output_state.clone(),
            output: output.clone(),
            output_tone,
            last_update_label: lang.last_update.clone(),
            last_update: snapshot
                .last_update()
                .map(|t| t.format("%H:%M:%S").to_string()),
            logging_label: lang.logging.clone(),
            logging: logging.clone(),
        }
    }

    /// Connection status text.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Colour for the connection status.
    #[must_use]
    pub fn status_tone(&self) -> Tone {
        self.status_tone
    }

    /// Output state text.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Colour for the output state.
    #[must_use]
    pub fn output_tone(&self) -> Tone {
        self.output_tone
    }

    /// Time of the last successful answer as `HH:MM:SS`.
    #[must_use]
    pub fn last_update(&self) -> Option<&str> {
        self.last_update.as_deref()
    }

    /// Logging status text.
    #[must_use]
    pub fn logging(&self) -> &str {
        &self.logging
    }
}

impl fmt::Display for StatusView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} | {} {}",
            self.status_label, self.status, self.output_label, self.output
        )?;
        if let Some(time) = &self.last_update {
            write!(f, " | {} {time}", self.last_update_label)?;
        }
        write!(f, " | {} {}", self.logging_label, self.logging)
    }
}
