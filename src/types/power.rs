// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power-related types for the controlled outlet.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Power state as reported by the device.
///
/// # Examples
///
/// ```
/// use tasmota_panel::types::PowerState;
///
/// assert_eq!("on".parse::<PowerState>().unwrap(), PowerState::On);
/// assert_eq!(PowerState::Off.as_str(), "OFF");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PowerState {
    /// Relay is off.
    Off,
    /// Relay is on.
    On,
}

impl PowerState {
    /// Returns the uppercase representation used by Tasmota.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerState {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ON" => Ok(Self::On),
            "OFF" => Ok(Self::Off),
            _ => Err(ValueError::InvalidPowerState(s.to_string())),
        }
    }
}

/// Output state as tracked by the panel.
///
/// Unlike [`PowerState`] this has a third value for "we don't know", which
/// is what the panel shows while the device is unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutputState {
    /// Relay reported on.
    On,
    /// Relay reported off.
    Off,
    /// No trustworthy reading.
    #[default]
    Unknown,
}

impl OutputState {
    /// Returns the uppercase label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl From<PowerState> for OutputState {
    fn from(state: PowerState) -> Self {
        match state {
            PowerState::On => Self::On,
            PowerState::Off => Self::Off,
        }
    }
}

impl fmt::Display for OutputState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Index of the controlled relay.
///
/// Tasmota devices expose up to 8 relays addressed as `Power1`..`Power8`.
///
/// # Examples
///
/// ```
/// use tasmota_panel::types::PowerIndex;
///
/// let idx = PowerIndex::new(2).unwrap();
/// assert_eq!(idx.value(), 2);
/// assert_eq!(idx.field_name(), "POWER2");
///
/// assert!(PowerIndex::new(0).is_err());
/// assert!(PowerIndex::new(9).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PowerIndex(u8);

impl PowerIndex {
    /// Lowest valid index.
    pub const MIN: u8 = 1;
    /// Highest valid index.
    pub const MAX: u8 = 8;

    /// Creates a new power index.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if `index` is not within 1-8.
    pub fn new(index: u8) -> Result<Self, ValueError> {
        if !(Self::MIN..=Self::MAX).contains(&index) {
            return Err(ValueError::OutOfRange {
                min: u16::from(Self::MIN),
                max: u16::from(Self::MAX),
                actual: u16::from(index),
            });
        }
        Ok(Self(index))
    }

    /// Index of the first relay.
    #[must_use]
    pub const fn one() -> Self {
        Self(1)
    }

    /// Returns the numeric value of the index.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Name of the JSON field carrying this relay's state, e.g. `POWER1`.
    #[must_use]
    pub fn field_name(&self) -> String {
        format!("POWER{}", self.0)
    }
}

impl Default for PowerIndex {
    fn default() -> Self {
        Self::one()
    }
}

impl TryFrom<u8> for PowerIndex {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PowerIndex> for u8 {
    fn from(index: PowerIndex) -> Self {
        index.0
    }
}

impl fmt::Display for PowerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_state_from_str_is_case_insensitive() {
        assert_eq!("ON".parse::<PowerState>().unwrap(), PowerState::On);
        assert_eq!("off".parse::<PowerState>().unwrap(), PowerState::Off);
        assert_eq!("On".parse::<PowerState>().unwrap(), PowerState::On);
    }

    #[test]
    fn power_state_from_str_invalid() {
        let result = "BLINK".parse::<PowerState>();
        assert!(matches!(result, Err(ValueError::InvalidPowerState(_))));
        assert!("".parse::<PowerState>().is_err());
    }

    #[test]
    fn output_state_defaults_to_unknown() {
        assert_eq!(OutputState::default(), OutputState::Unknown);
    }

    #[test]
    fn output_state_from_power_state() {
        assert_eq!(OutputState::from(PowerState::On), OutputState::On);
        assert_eq!(OutputState::from(PowerState::Off), OutputState::Off);
        assert_eq!(OutputState::Unknown.to_string(), "UNKNOWN");
    }

    #[test]
    fn power_index_valid_range() {
        for i in 1..=8 {
            assert_eq!(PowerIndex::new(i).unwrap().value(), i);
        }
        assert!(PowerIndex::new(0).is_err());
        assert!(PowerIndex::new(9).is_err());
    }

    #[test]
    fn power_index_deserializes_with_validation() {
        let idx: PowerIndex = serde_json::from_str("3").unwrap();
        assert_eq!(idx.value(), 3);
        assert!(serde_json::from_str::<PowerIndex>("12").is_err());
    }
}
