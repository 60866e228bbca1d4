// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport for the Tasmota web API.

use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::command::{PowerAction, PowerCommand};
use crate::config::DeviceConfig;
use crate::error::{Error, ProtocolError, TransportError};
use crate::protocol::CommandResponse;

/// Builds the request target for a power action.
///
/// The result is always `http://{host}/cm?...`. Credentials, when
/// configured, come before the command parameter.
///
/// # Examples
///
/// ```
/// use tasmota_panel::command::PowerAction;
/// use tasmota_panel::config::DeviceConfig;
/// use tasmota_panel::protocol::build_command_url;
///
/// let config = DeviceConfig::new("192.168.1.100").with_credentials("admin", "joker");
/// assert_eq!(
///     build_command_url(&config, PowerAction::On),
///     "http://192.168.1.100/cm?user=admin&password=joker&cmnd=Power1%20On"
/// );
/// ```
#[must_use]
pub fn build_command_url(config: &DeviceConfig, action: PowerAction) -> String {
    let command = PowerCommand::new(config.output(), action).to_http_command();
    let encoded_command = urlencoding::encode(&command);

    match config.credentials() {
        Some((username, password)) => format!(
            "http://{}/cm?user={}&password={}&cmnd={}",
            config.host(),
            urlencoding::encode(username),
            urlencoding::encode(password),
            encoded_command
        ),
        None => format!("http://{}/cm?cmnd={}", config.host(), encoded_command),
    }
}

/// HTTP client for issuing single GET requests to the device.
///
/// Cheap to clone; clones share the underlying connection pool. Each request
/// carries its own deadline, so polls and commands can use different
/// timeouts through the same client.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::ClientBuild` if the TLS backend cannot be
    /// initialised.
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .build()
            .map_err(TransportError::ClientBuild)?;
        Ok(Self { client })
    }

    /// Sends a GET request and returns the body of a 200 reply.
    ///
    /// # Errors
    ///
    /// - `TransportError::Timeout` if no reply arrives within `timeout`
    /// - `TransportError::Http` for connection-level failures
    /// - `ProtocolError::UnexpectedStatus` for any status other than 200
    pub async fn get(&self, url: &str, timeout: Duration) -> Result<CommandResponse, Error> {
        tracing::debug!(timeout_ms = timeout.as_millis(), "Sending HTTP request");

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::debug!(status = status.as_u16(), "Unexpected HTTP status");
            return Err(ProtocolError::UnexpectedStatus(status.as_u16()).into());
        }

        let body = response.text().await.map_err(|e| classify(e, timeout))?;

        tracing::debug!(body = %body, "Received HTTP response");

        Ok(CommandResponse::new(body))
    }
}

fn classify(error: reqwest::Error, timeout: Duration) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout(timeout)
    } else {
        TransportError::Http(error)
    }
}
