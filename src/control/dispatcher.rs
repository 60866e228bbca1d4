// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fire-and-forget command execution.

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use super::Reconciler;
use crate::command::PowerAction;
use crate::error::{Error, Result};
use crate::event::PanelEvent;
use crate::protocol::build_command_url;
use crate::state::Transition;

/// Bounded command queue drained by a single worker task.
///
/// [`dispatch`](Self::dispatch) never waits on the network. Commands run one
/// after another in submission order; a successful command is followed by an
/// immediate reconciliation, a failed one marks the device as unreachable.
#[derive(Debug)]
pub struct CommandDispatcher {
    sender: mpsc::Sender<PowerAction>,
    worker: JoinHandle<()>,
    reconciler: Arc<Reconciler>,
}

impl CommandDispatcher {
    /// Number of commands that may wait behind the one in flight.
    pub const QUEUE_CAPACITY: usize = 8;

    /// Spawns the worker task on the current runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn spawn(reconciler: Arc<Reconciler>) -> Self {
        let (sender, receiver) = mpsc::channel(Self::QUEUE_CAPACITY);
        let worker = tokio::spawn(run(Arc::clone(&reconciler), receiver));
        Self {
            sender,
            worker,
            reconciler,
        }
    }

    /// Queues `action` and returns immediately.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CommandQueueFull`] if the queue is saturated, or
    /// [`Error::ShuttingDown`] if the worker is gone. Either way the command
    /// is dropped and the event log says so.
    pub fn dispatch(&self, action: PowerAction) -> Result<()> {
        self.sender.try_send(action).map_err(|e| {
            let error = match e {
                TrySendError::Full(_) => Error::CommandQueueFull,
                TrySendError::Closed(_) => Error::ShuttingDown,
            };
            self.reconciler
                .log()
                .record(format!("Command {} dropped: {error}", action.token()));
            tracing::warn!(%action, "Command dropped: {error}");
            error
        })
    }

    /// Closes the queue and waits until every queued command has run.
    pub async fn close(self) {
        drop(self.sender);
        if let Err(e) = self.worker.await {
            tracing::error!("Command worker failed: {e}");
        }
    }
}

async fn run(reconciler: Arc<Reconciler>, mut receiver: mpsc::Receiver<PowerAction>) {
    while let Some(action) = receiver.recv().await {
        execute(&reconciler, action).await;
    }
    tracing::debug!("Command worker stopped");
}

async fn execute(reconciler: &Reconciler, action: PowerAction) {
    let config = reconciler.config();
    let log = reconciler.log();
    let token = action.token();

    let url = build_command_url(config, action);
    log.record(format!("Sending command: {token}"));

    match reconciler.client().get(&url, config.command_timeout()).await {
        Ok(_) => {
            log.record(format!("Command {token} successful"));
            reconciler.reconcile().await;
        }
        Err(e) => {
            let reason = e.to_string();
            log.record(format!("Command {token} failed: {reason}"));

            if reconciler.apply_failure().await == Transition::ConnectionLost {
                tracing::warn!(%action, "Command failed while connected: {reason}");
                reconciler
                    .events()
                    .publish(PanelEvent::command_failed(action, reason));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeviceConfig;
    use crate::event::EventBus;
    use crate::event_log::{EventLog, MemoryLog};
    use crate::protocol::HttpClient;
    use std::time::Duration;

    fn dispatcher(buffer: &MemoryLog) -> (CommandDispatcher, Arc<Reconciler>) {
        let config = DeviceConfig::new("127.0.0.1:9")
            .with_poll_timeout(Duration::from_millis(200))
            .with_command_timeout(Duration::from_millis(150));
        let reconciler = Arc::new(Reconciler::new(
            Arc::new(config),
            HttpClient::new().unwrap(),
            EventLog::to_writer(buffer.clone()),
            EventBus::new(),
        ));
        (CommandDispatcher::spawn(Arc::clone(&reconciler)), reconciler)
    }

    #[tokio::test]
    async fn failed_command_while_disconnected_does_not_notify() {
        let buffer = MemoryLog::new();
        let (dispatcher, reconciler) = dispatcher(&buffer);
        let mut events = reconciler.events().subscribe();

        dispatcher.dispatch(PowerAction::On).unwrap();
        dispatcher.close().await;

        let messages = buffer.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], "Sending command: On");
        assert!(messages[1].starts_with("Command On failed: "));
        assert!(!reconciler.snapshot().is_connected());
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn commands_run_in_submission_order() {
        let buffer = MemoryLog::new();
        let (dispatcher, _) = dispatcher(&buffer);

        dispatcher.dispatch(PowerAction::Off).unwrap();
        dispatcher.dispatch(PowerAction::Toggle).unwrap();
        dispatcher.close().await;

        let sent: Vec<String> = buffer
            .messages()
            .into_iter()
            .filter(|m| m.starts_with("Sending command: "))
            .collect();
        assert_eq!(sent, vec!["Sending command: Off", "Sending command: Toggle"]);
    }
}
