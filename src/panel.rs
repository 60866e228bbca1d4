// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Composition root for a running panel.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};

use crate::command::PowerAction;
use crate::config::DeviceConfig;
use crate::control::{CommandDispatcher, Poller, Reconciler, Shutdown};
use crate::error::Result;
use crate::event::{EventBus, PanelEvent};
use crate::event_log::EventLog;
use crate::protocol::HttpClient;
use crate::state::Snapshot;

/// A running control panel for one device output.
///
/// Owns the reconciler, the poller task and the command worker. Displays
/// read [`Snapshot`]s through [`watch`](Self::watch) and listen for
/// [`PanelEvent`]s through [`subscribe`](Self::subscribe).
///
/// # Examples
///
/// ```no_run
/// use tasmota_panel::{DeviceConfig, EventLog, Panel};
///
/// # async fn example() -> tasmota_panel::Result<()> {
/// let config = DeviceConfig::new("192.168.1.100").with_poll_interval_secs(5);
/// let panel = Panel::start(config, EventLog::disabled())?;
///
/// panel.power_on()?;
/// let mut snapshots = panel.watch();
/// snapshots.changed().await.ok();
/// println!("{}", snapshots.borrow().output());
///
/// panel.shutdown().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Panel {
    reconciler: Arc<Reconciler>,
    poller: Poller,
    dispatcher: CommandDispatcher,
    shutdown: Shutdown,
}

impl Panel {
    /// Starts polling and accepting commands.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn start(config: DeviceConfig, log: EventLog) -> Result<Self> {
        if config.poll_interval_adjusted() {
            log.record(format!(
                "Adjusted poll interval to {} seconds (was too small)",
                config.poll_interval().as_secs()
            ));
            tracing::warn!(
                interval_secs = config.poll_interval().as_secs(),
                "Poll interval too small, using default"
            );
        }

        let client = HttpClient::new()?;
        let config = Arc::new(config);
        let reconciler = Arc::new(Reconciler::new(
            Arc::clone(&config),
            client,
            log,
            EventBus::new(),
        ));

        let shutdown = Shutdown::new();
        let poller = Poller::spawn(
            Arc::clone(&reconciler),
            config.poll_interval(),
            shutdown.signal(),
        );
        let dispatcher = CommandDispatcher::spawn(Arc::clone(&reconciler));

        tracing::info!(
            host = config.host(),
            output = config.output().value(),
            "Panel started"
        );

        Ok(Self {
            reconciler,
            poller,
            dispatcher,
            shutdown,
        })
    }

    /// Returns the device configuration.
    #[must_use]
    pub fn config(&self) -> &DeviceConfig {
        self.reconciler.config()
    }

    /// Returns the most recent snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.reconciler.snapshot()
    }

    /// Returns a receiver notified after every reconciliation.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Snapshot> {
        self.reconciler.watch()
    }

    /// Subscribes to panel events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PanelEvent> {
        self.reconciler.events().subscribe()
    }

    /// Queues a command. See [`CommandDispatcher::dispatch`].
    ///
    /// # Errors
    ///
    /// Returns an error if the command queue is full or closed.
    pub fn dispatch(&self, action: PowerAction) -> Result<()> {
        self.dispatcher.dispatch(action)
    }

    /// Queues `Power{N} On`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command queue is full or closed.
    pub fn power_on(&self) -> Result<()> {
        self.dispatch(PowerAction::On)
    }

    /// Queues `Power{N} Off`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command queue is full or closed.
    pub fn power_off(&self) -> Result<()> {
        self.dispatch(PowerAction::Off)
    }

    /// Queues `Power{N} Toggle`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command queue is full or closed.
    pub fn toggle(&self) -> Result<()> {
        self.dispatch(PowerAction::Toggle)
    }

    /// Stops polling, runs the remaining queued commands and waits for both
    /// background tasks to finish.
    ///
    /// The event log is left open; closing it is up to the owner.
    pub async fn shutdown(self) {
        self.shutdown.trigger();
        self.poller.join().await;
        self.dispatcher.close().await;
        tracing::info!("Panel stopped");
    }
}
