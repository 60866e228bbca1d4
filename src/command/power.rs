// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power control commands.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;
use crate::types::PowerIndex;

/// What to do with the relay.
///
/// The token is sent verbatim after the `Power{N}` command name.
///
/// # Examples
///
/// ```
/// use tasmota_panel::command::PowerAction;
///
/// assert_eq!(PowerAction::Toggle.token(), "Toggle");
/// assert_eq!("off".parse::<PowerAction>().unwrap(), PowerAction::Off);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerAction {
    /// Query the current state without changing it.
    State,
    /// Switch the relay on.
    On,
    /// Switch the relay off.
    Off,
    /// Flip the relay.
    Toggle,
}

impl PowerAction {
    /// Returns the command token.
    #[must_use]
    pub const fn token(&self) -> &'static str {
        match self {
            Self::State => "State",
            Self::On => "On",
            Self::Off => "Off",
            Self::Toggle => "Toggle",
        }
    }

    /// Returns `true` for actions that change the relay.
    #[must_use]
    pub const fn is_switching(&self) -> bool {
        !matches!(self, Self::State)
    }
}

impl fmt::Display for PowerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for PowerAction {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "state" => Ok(Self::State),
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            "toggle" => Ok(Self::Toggle),
            _ => Err(ValueError::UnknownAction(s.to_string())),
        }
    }
}

/// A `Power{N}` command addressed to one relay.
///
/// # Examples
///
/// ```
/// use tasmota_panel::command::{PowerAction, PowerCommand};
/// use tasmota_panel::types::PowerIndex;
///
/// let cmd = PowerCommand::new(PowerIndex::one(), PowerAction::On);
/// assert_eq!(cmd.name(), "Power1");
/// assert_eq!(cmd.to_http_command(), "Power1 On");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerCommand {
    index: PowerIndex,
    action: PowerAction,
}

impl PowerCommand {
    /// Creates a command for the given relay and action.
    #[must_use]
    pub const fn new(index: PowerIndex, action: PowerAction) -> Self {
        Self { index, action }
    }

    /// Returns the command name with its index suffix, e.g. `Power1`.
    #[must_use]
    pub fn name(&self) -> String {
        format!("Power{}", self.index.value())
    }

    /// Returns the full command string, e.g. `Power1 Toggle`.
    #[must_use]
    pub fn to_http_command(&self) -> String {
        format!("{} {}", self.name(), self.action.token())
    }
}
