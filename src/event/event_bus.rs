// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan-out of [`PanelEvent`]s to displays.

use tokio::sync::broadcast;

use super::PanelEvent;

/// Broadcast channel shared by the reconciler, the command worker and any
/// number of displays.
///
/// Displays that stop reading lose the oldest events once
/// [`CAPACITY`](Self::CAPACITY) are pending and see `RecvError::Lagged`.
///
/// # Examples
///
/// ```
/// use tasmota_panel::event::{EventBus, PanelEvent};
///
/// let bus = EventBus::new();
/// let mut display = bus.subscribe();
///
/// assert_eq!(bus.publish(PanelEvent::connection_changed(true)), 1);
/// assert_eq!(display.try_recv().unwrap(), PanelEvent::connection_changed(true));
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<PanelEvent>,
}

impl EventBus {
    /// Events a display may fall behind before it starts losing them.
    pub const CAPACITY: usize = 64;

    /// Creates a bus with no displays attached.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(Self::CAPACITY);
        Self { sender }
    }

    /// Attaches a display. It sees only events published afterwards.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PanelEvent> {
        self.sender.subscribe()
    }

    /// Sends `event` to every attached display and returns how many got it.
    pub fn publish(&self, event: PanelEvent) -> usize {
        match self.sender.send(event) {
            Ok(delivered) => delivered,
            Err(broadcast::error::SendError(event)) => {
                tracing::trace!(?event, "No display attached, event dropped");
                0
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::PowerAction;
    use tokio::sync::broadcast::error::TryRecvError;

    #[test]
    fn publish_without_displays_drops_event() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(PanelEvent::connection_changed(false)), 0);
    }

    #[test]
    fn detached_display_no_longer_receives() {
        let bus = EventBus::new();
        let display = bus.subscribe();
        assert_eq!(bus.publish(PanelEvent::connection_changed(true)), 1);

        drop(display);
        assert_eq!(bus.publish(PanelEvent::connection_changed(false)), 0);
    }

    #[tokio::test]
    async fn every_display_sees_command_failure() {
        let bus = EventBus::new();
        let mut status_line = bus.subscribe();
        let mut alerts = bus.clone().subscribe();

        let delivered = bus.publish(PanelEvent::command_failed(PowerAction::Off, "HTTP 500"));

        assert_eq!(delivered, 2);
        let first = status_line.recv().await.unwrap();
        assert!(first.is_command_failure());
        assert_eq!(first, alerts.recv().await.unwrap());
    }

    #[test]
    fn late_display_misses_earlier_events() {
        let bus = EventBus::new();
        let _early = bus.subscribe();
        bus.publish(PanelEvent::connection_changed(true));

        let mut late = bus.subscribe();
        assert!(matches!(late.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn slow_display_lags() {
        let bus = EventBus::new();
        let mut slow = bus.subscribe();
        for _ in 0..=EventBus::CAPACITY {
            bus.publish(PanelEvent::connection_changed(true));
        }
        assert!(matches!(slow.try_recv(), Err(TryRecvError::Lagged(1))));
    }
}
