// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Process-wide stop flag.

use tokio::sync::watch;

/// Owner side of the stop flag.
///
/// # Examples
///
/// ```
/// use tasmota_panel::control::Shutdown;
///
/// let shutdown = Shutdown::new();
/// let signal = shutdown.signal();
/// assert!(!signal.is_triggered());
///
/// shutdown.trigger();
/// assert!(signal.is_triggered());
/// ```
#[derive(Debug)]
pub struct Shutdown {
    sender: watch::Sender<bool>,
}

impl Shutdown {
    /// Creates an untriggered flag.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender }
    }

    /// Returns a receiver for the flag.
    #[must_use]
    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            receiver: self.sender.subscribe(),
        }
    }

    /// Raises the flag. Idempotent.
    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiver side of the stop flag.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    receiver: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Returns `true` once the flag has been raised.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Completes when the flag is raised or its owner is dropped.
    pub async fn triggered(&mut self) {
        while !*self.receiver.borrow_and_update() {
            // A dropped owner can no longer stop us; treat it as a stop.
            if self.receiver.changed().await.is_err() {
                return;
            }
        }
    }
}
