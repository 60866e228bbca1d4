// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Validated device configuration.

use std::time::Duration;

use crate::error::ConfigError;
use crate::types::PowerIndex;

use super::Settings;

/// Immutable configuration of the controlled device.
///
/// Built once at startup and shared read-only by every component.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tasmota_panel::config::DeviceConfig;
///
/// let config = DeviceConfig::new("192.168.1.100")
///     .with_credentials("admin", "joker")
///     .with_poll_interval_secs(0);
///
/// assert_eq!(config.poll_interval(), Duration::from_secs(5));
/// assert!(config.poll_interval_adjusted());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    host: String,
    output: PowerIndex,
    credentials: Option<(String, String)>,
    poll_interval: Duration,
    poll_interval_adjusted: bool,
    logging: bool,
    poll_timeout: Duration,
    command_timeout: Duration,
}

impl DeviceConfig {
    /// Poll interval used when none (or an invalid one) is configured.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
    /// Smallest accepted poll interval, in seconds.
    pub const MIN_POLL_INTERVAL_SECS: f64 = 1.0;
    /// Deadline for a status poll.
    pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(4);
    /// Deadline for a switching command. Shorter than the poll timeout.
    pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(3);

    /// Creates a configuration for the given host with defaults elsewhere.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            output: PowerIndex::one(),
            credentials: None,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            poll_interval_adjusted: false,
            logging: false,
            poll_timeout: Self::DEFAULT_POLL_TIMEOUT,
            command_timeout: Self::DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Builds the configuration from loaded settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Value` if the output index is not within 1-8.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let output = PowerIndex::new(settings.output)?;
        Ok(Self::new(settings.device_ip.clone())
            .with_output(output)
            .with_credentials(settings.username.clone(), settings.password.clone())
            .with_poll_interval_secs(settings.poll_interval)
            .with_logging(settings.logging))
    }

    /// Sets the relay index.
    #[must_use]
    pub fn with_output(mut self, output: PowerIndex) -> Self {
        self.output = output;
        self
    }

    /// Sets credentials.
    ///
    /// Credentials are only kept when both parts are non-empty; a half
    /// filled pair is treated as no credentials at all.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let (username, password) = (username.into(), password.into());
        self.credentials = if username.is_empty() || password.is_empty() {
            None
        } else {
            Some((username, password))
        };
        self
    }

    /// Sets the poll interval in seconds; fractions are kept.
    ///
    /// Anything below one second, or not representable as a duration, is
    /// replaced by [`DEFAULT_POLL_INTERVAL`](Self::DEFAULT_POLL_INTERVAL)
    /// and flagged so the correction can be logged.
    #[must_use]
    pub fn with_poll_interval_secs(mut self, secs: impl Into<f64>) -> Self {
        let secs = secs.into();
        match Duration::try_from_secs_f64(secs) {
            Ok(interval) if secs >= Self::MIN_POLL_INTERVAL_SECS => {
                self.poll_interval = interval;
                self.poll_interval_adjusted = false;
            }
            _ => {
                self.poll_interval = Self::DEFAULT_POLL_INTERVAL;
                self.poll_interval_adjusted = true;
            }
        }
        self
    }

    /// Enables or disables the event log.
    #[must_use]
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.logging = enabled;
        self
    }

    /// Overrides the status poll timeout.
    ///
    /// A command timeout that is no longer shorter is cut down, see
    /// [`with_command_timeout`](Self::with_command_timeout).
    #[must_use]
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        let command_timeout = self.command_timeout;
        self.with_command_timeout(command_timeout)
    }

    /// Overrides the command timeout.
    ///
    /// The command timeout must stay below the poll timeout. A value that is
    /// not is replaced by three quarters of the poll timeout.
    #[must_use]
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = if timeout < self.poll_timeout {
            timeout
        } else {
            let capped = self.poll_timeout * 3 / 4;
            tracing::warn!(
                requested_ms = timeout.as_millis(),
                capped_ms = capped.as_millis(),
                "Command timeout must be shorter than the poll timeout"
            );
            capped
        };
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the relay index.
    #[must_use]
    pub fn output(&self) -> PowerIndex {
        self.output
    }

    /// Returns the credentials if set.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        self.credentials
            .as_ref()
            .map(|(u, p)| (u.as_str(), p.as_str()))
    }

    /// Returns the effective poll interval.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Returns `true` if the configured poll interval had to be corrected.
    #[must_use]
    pub fn poll_interval_adjusted(&self) -> bool {
        self.poll_interval_adjusted
    }

    /// Returns whether the event log is enabled.
    #[must_use]
    pub fn logging(&self) -> bool {
        self.logging
    }

    /// Returns the status poll timeout.
    #[must_use]
    pub fn poll_timeout(&self) -> Duration {
        self.poll_timeout
    }

    /// Returns the command timeout.
    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        self.command_timeout
    }
}
