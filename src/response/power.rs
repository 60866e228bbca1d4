// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power response parsing.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ProtocolError;
use crate::types::{PowerIndex, PowerState};

/// Reply to a `Power{N}` command.
///
/// Tasmota answers with a flat JSON object such as `{"POWER1": "ON"}`.
/// Single-relay devices may report the bare `POWER` key instead, which is
/// accepted for relay 1.
///
/// # Examples
///
/// ```
/// use tasmota_panel::response::PowerResponse;
/// use tasmota_panel::types::{PowerIndex, PowerState};
///
/// let response = PowerResponse::from_json(r#"{"POWER1": "on"}"#).unwrap();
/// assert_eq!(response.power_state(PowerIndex::one()).unwrap(), PowerState::On);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct PowerResponse {
    fields: Map<String, Value>,
}

impl PowerResponse {
    /// Parses a response body.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::Json` if the body is not a JSON object.
    pub fn from_json(body: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(body).map_err(ProtocolError::from)
    }

    /// Returns the state of the given relay.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::MissingField` if the relay's field is absent,
    /// or `ProtocolError::InvalidValue` if it is not `ON`/`OFF`.
    pub fn power_state(&self, index: PowerIndex) -> Result<PowerState, ProtocolError> {
        let field = index.field_name();
        let value = self
            .fields
            .get(&field)
            .or_else(|| {
                if index == PowerIndex::one() {
                    self.fields.get("POWER")
                } else {
                    None
                }
            })
            .ok_or_else(|| ProtocolError::MissingField(field.clone()))?;

        let Value::String(raw) = value else {
            return Err(ProtocolError::InvalidValue {
                field,
                value: value.to_string(),
            });
        };

        raw.parse().map_err(|_| ProtocolError::InvalidValue {
            field,
            value: raw.clone(),
        })
    }
}
