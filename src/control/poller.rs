// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Periodic status polling.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::{Reconciler, ShutdownSignal};

/// Background task that reconciles on a fixed period.
///
/// The first reconciliation happens immediately. A reconciliation that takes
/// longer than the period pushes the next tick back instead of bursting.
#[derive(Debug)]
pub struct Poller {
    handle: JoinHandle<()>,
}

impl Poller {
    /// Spawns the polling task on the current runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime, or if `period` is zero.
    #[must_use]
    pub fn spawn(reconciler: Arc<Reconciler>, period: Duration, shutdown: ShutdownSignal) -> Self {
        let handle = tokio::spawn(run(reconciler, period, shutdown));
        Self { handle }
    }

    /// Waits for the task to finish after shutdown was triggered.
    pub async fn join(self) {
        if let Err(e) = self.handle.await {
            tracing::error!("Poller task failed: {e}");
        }
    }
}

async fn run(reconciler: Arc<Reconciler>, period: Duration, mut shutdown: ShutdownSignal) {
    tracing::debug!(period_ms = period.as_millis(), "Poller started");

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = shutdown.triggered() => break,
            _ = ticker.tick() => {}
        }

        let transition = reconciler.reconcile().await;
        tracing::trace!(?transition, "Poll finished");
    }

    tracing::debug!("Poller stopped");
}
