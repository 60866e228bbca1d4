// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Out-of-band notifications for the display layer.
//!
//! Regular state updates travel as snapshots over a watch channel. The
//! [`EventBus`] carries the things a display should react to immediately,
//! most importantly a command that failed while the device looked online.

mod event_bus;
mod panel_event;

pub use event_bus::EventBus;
pub use panel_event::PanelEvent;
