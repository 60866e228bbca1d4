// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection and output state machine.

use chrono::{DateTime, Local};

use crate::error::Error;
use crate::event_log::EventLog;
use crate::types::{OutputState, PowerState};

/// What a reconciliation did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Device reachable and the output did not change.
    Unchanged,
    /// Device reachable and the output changed.
    OutputChanged {
        /// Output before the update.
        from: OutputState,
        /// Output after the update.
        to: OutputState,
    },
    /// Device unreachable; it was already considered disconnected.
    Failed,
    /// Device unreachable after having been connected.
    ConnectionLost,
}

/// Connection status and last known output of the device.
///
/// Starts disconnected with an unknown output. The only way to change it is
/// [`reconcile`](Self::reconcile), which keeps the invariant that the output
/// is [`OutputState::Unknown`] whenever the device is disconnected.
///
/// # Examples
///
/// ```
/// use chrono::Local;
/// use tasmota_panel::event_log::EventLog;
/// use tasmota_panel::state::{ConnectionState, Transition};
/// use tasmota_panel::types::{OutputState, PowerState};
///
/// let mut state = ConnectionState::new();
/// let log = EventLog::disabled();
///
/// let transition = state.reconcile(Ok(PowerState::On), Local::now(), &log);
/// assert!(matches!(transition, Transition::OutputChanged { .. }));
/// assert!(state.is_connected());
/// assert_eq!(state.output(), OutputState::On);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionState {
    connected: bool,
    output: OutputState,
    last_update: Option<DateTime<Local>>,
}

impl ConnectionState {
    /// Creates the initial, disconnected state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the last reconciliation reached the device.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Returns the last known output state.
    #[must_use]
    pub fn output(&self) -> OutputState {
        self.output
    }

    /// Returns when the device last answered successfully.
    #[must_use]
    pub fn last_update(&self) -> Option<DateTime<Local>> {
        self.last_update
    }

    /// Applies the result of a status query.
    ///
    /// On success the device becomes connected, the output takes the
    /// reported value and the timestamp moves to `now`. An output change is
    /// logged before the stored value is overwritten.
    ///
    /// On failure the error is logged, `Connection lost` is logged if the
    /// device was connected, and the state drops to disconnected/unknown.
    /// The timestamp keeps the time of the last successful answer.
    pub fn reconcile(
        &mut self,
        result: Result<PowerState, Error>,
        now: DateTime<Local>,
        log: &EventLog,
    ) -> Transition {
        match result {
            Ok(power) => {
                let previous = self.output;
                let output = OutputState::from(power);

                if output != previous {
                    log.record(format!("Output state changed from {previous} to {output}"));
                }

                self.connected = true;
                self.output = output;
                self.last_update = Some(now);

                if output == previous {
                    Transition::Unchanged
                } else {
                    Transition::OutputChanged {
                        from: previous,
                        to: output,
                    }
                }
            }
            Err(e) => {
                log.record(format!("Connection check failed: {e}"));
                if self.connected {
                    tracing::warn!("Connection to device lost: {e}");
                }
                self.mark_unreachable(log)
            }
        }
    }

    /// Drops to disconnected/unknown without a status query.
    ///
    /// Used when a command could not be delivered; the caller has already
    /// logged why. Only `Connection lost` is logged here, and only if the
    /// device was connected.
    pub fn mark_unreachable(&mut self, log: &EventLog) -> Transition {
        let was_connected = self.connected;
        if was_connected {
            log.record("Connection lost");
        }

        self.connected = false;
        self.output = OutputState::Unknown;

        if was_connected {
            Transition::ConnectionLost
        } else {
            Transition::Failed
        }
    }
}

/// Read-only copy of the state handed to the display layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    state: ConnectionState,
    logging_enabled: bool,
}

impl Snapshot {
    /// Captures the given state.
    #[must_use]
    pub fn new(state: &ConnectionState, logging_enabled: bool) -> Self {
        Self {
            state: state.clone(),
            logging_enabled,
        }
    }

    /// Returns the captured state.
    #[must_use]
    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Returns `true` if the device was reachable.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    /// Returns the output state.
    #[must_use]
    pub fn output(&self) -> OutputState {
        self.state.output()
    }

    /// Returns the time of the last successful answer.
    #[must_use]
    pub fn last_update(&self) -> Option<DateTime<Local>> {
        self.state.last_update()
    }

    /// Returns whether the event log is enabled.
    #[must_use]
    pub fn logging_enabled(&self) -> bool {
        self.logging_enabled
    }
}
