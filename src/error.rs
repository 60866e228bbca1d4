// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the panel.
//!
//! Failures fall into three families: talking to the device
//! ([`TransportError`]), understanding what it answered ([`ProtocolError`])
//! and reading the panel's own configuration ([`ConfigError`]). Transport and
//! protocol errors never escape a reconciliation; they degrade the
//! connection state and are written to the event log.

use std::time::Duration;

use thiserror::Error;

/// The main error type for this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The device could not be reached.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The device answered with something we could not use.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A value failed validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Filesystem failure outside of configuration loading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The command queue is saturated; the command was dropped.
    #[error("command queue is full")]
    CommandQueueFull,

    /// The panel is shutting down and no longer accepts commands.
    #[error("panel is shutting down")]
    ShuttingDown,
}

/// Network-level failures.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed before a response was received.
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// Request did not complete within its deadline.
    #[error("request timed out after {} ms", .0.as_millis())]
    Timeout(Duration),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// Failures to interpret a device reply.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The device answered with a status other than 200.
    #[error("unexpected HTTP status {0}")]
    UnexpectedStatus(u16),

    /// The body is not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),

    /// A field is present but holds an unusable value.
    #[error("invalid value for {field}: {value}")]
    InvalidValue {
        /// The offending field.
        field: String,
        /// The raw value.
        value: String,
    },
}

/// Errors while loading settings or language tables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid JSON for the expected shape.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A setting holds an invalid value.
    #[error(transparent)]
    Value(#[from] ValueError),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// An invalid power state string was provided.
    #[error("invalid power state: {0}")]
    InvalidPowerState(String),

    /// An unknown power action was requested.
    #[error("unknown power action: {0}")]
    UnknownAction(String),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
