// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Serialized reconciliation path shared by the poller and the dispatcher.

use std::sync::Arc;

use chrono::Local;
use tokio::sync::{Mutex, watch};

use crate::command::PowerAction;
use crate::config::DeviceConfig;
use crate::error::Error;
use crate::event::{EventBus, PanelEvent};
use crate::event_log::EventLog;
use crate::protocol::{HttpClient, build_command_url};
use crate::state::{ConnectionState, Snapshot, Transition};
use crate::types::PowerState;

/// Owner of the live [`ConnectionState`].
///
/// The state sits behind an async mutex that is held for a whole
/// reconciliation (query, apply, publish), so at most one reconciliation
/// runs at a time no matter who triggered it. Readers never take the lock;
/// they get [`Snapshot`]s from a watch channel that is refreshed after every
/// reconciliation.
#[derive(Debug)]
pub struct Reconciler {
    config: Arc<DeviceConfig>,
    client: HttpClient,
    log: EventLog,
    events: EventBus,
    state: Mutex<ConnectionState>,
    snapshots: watch::Sender<Snapshot>,
}

impl Reconciler {
    /// Creates a reconciler with the initial, disconnected state.
    #[must_use]
    pub fn new(
        config: Arc<DeviceConfig>,
        client: HttpClient,
        log: EventLog,
        events: EventBus,
    ) -> Self {
        let state = ConnectionState::new();
        let (snapshots, _) = watch::channel(Snapshot::new(&state, log.is_enabled()));
        Self {
            config,
            client,
            log,
            events,
            state: Mutex::new(state),
            snapshots,
        }
    }

    /// Queries the device and applies the answer.
    pub async fn reconcile(&self) -> Transition {
        let mut state = self.state.lock().await;
        let result = self.query().await;
        self.apply(&mut state, |state, log| {
            state.reconcile(result, Local::now(), log)
        })
    }

    /// Marks the device unreachable after a failed command.
    ///
    /// No round-trip is made; the caller logs the command error itself.
    pub async fn apply_failure(&self) -> Transition {
        let mut state = self.state.lock().await;
        self.apply(&mut state, ConnectionState::mark_unreachable)
    }

    /// Returns the most recent snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Returns a receiver notified after every reconciliation.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    pub(crate) fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub(crate) fn client(&self) -> &HttpClient {
        &self.client
    }

    pub(crate) fn log(&self) -> &EventLog {
        &self.log
    }

    pub(crate) fn events(&self) -> &EventBus {
        &self.events
    }

    async fn query(&self) -> Result<PowerState, Error> {
        let url = build_command_url(&self.config, PowerAction::State);
        let response = self.client.get(&url, self.config.poll_timeout()).await?;
        Ok(response.power_state(self.config.output())?)
    }

    fn apply(
        &self,
        state: &mut ConnectionState,
        update: impl FnOnce(&mut ConnectionState, &EventLog) -> Transition,
    ) -> Transition {
        let was_connected = state.is_connected();
        let transition = update(state, &self.log);

        if state.is_connected() != was_connected {
            tracing::info!(connected = state.is_connected(), "Device connectivity changed");
            self.events
                .publish(PanelEvent::connection_changed(state.is_connected()));
        }

        self.snapshots
            .send_replace(Snapshot::new(state, self.log.is_enabled()));
        transition
    }
}
