// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Panel event types.

use crate::command::PowerAction;

/// Events pushed to the display layer outside the regular snapshots.
///
/// # Examples
///
/// ```
/// use tasmota_panel::command::PowerAction;
/// use tasmota_panel::event::PanelEvent;
///
/// let event = PanelEvent::command_failed(PowerAction::On, "request timed out after 3000 ms");
/// assert!(event.is_command_failure());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    /// The device became reachable or unreachable.
    ConnectionChanged {
        /// Whether the device is now reachable.
        connected: bool,
    },

    /// A command failed while the device was believed to be online.
    ///
    /// This is the one condition that should interrupt the user.
    CommandFailed {
        /// The action that failed.
        action: PowerAction,
        /// Human-readable reason.
        reason: String,
    },
}

impl PanelEvent {
    /// Creates a connection change event.
    #[must_use]
    pub fn connection_changed(connected: bool) -> Self {
        Self::ConnectionChanged { connected }
    }

    /// Creates a command failure event.
    #[must_use]
    pub fn command_failed(action: PowerAction, reason: impl Into<String>) -> Self {
        Self::CommandFailed {
            action,
            reason: reason.into(),
        }
    }

    /// Returns `true` for [`PanelEvent::CommandFailed`].
    #[must_use]
    pub fn is_command_failure(&self) -> bool {
        matches!(self, Self::CommandFailed { .. })
    }
}
