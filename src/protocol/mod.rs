// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Talking to the device.
//!
//! The device exposes the Tasmota web API endpoint `/cm?cmnd=<command>`.
//! [`build_command_url`] composes request targets and [`HttpClient`] sends
//! them with a per-request deadline.

mod http;

pub use http::{HttpClient, build_command_url};

use crate::error::ProtocolError;
use crate::response::PowerResponse;
use crate::types::{PowerIndex, PowerState};

/// Response from a Tasmota command.
#[derive(Debug, Clone)]
pub struct CommandResponse {
    /// The raw JSON response body.
    body: String,
}

impl CommandResponse {
    /// Creates a new command response with the given body.
    #[must_use]
    pub fn new(body: String) -> Self {
        Self { body }
    }

    /// Returns the raw JSON response body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Parses the body and extracts the state of one relay.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the body is not JSON or the relay's field
    /// is missing or invalid.
    pub fn power_state(&self, index: PowerIndex) -> Result<PowerState, ProtocolError> {
        PowerResponse::from_json(&self.body)?.power_state(index)
    }
}
