// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state tracking.
//!
//! [`ConnectionState`] is the small state machine at the heart of the panel:
//! disconnected, or connected with an output of ON, OFF or UNKNOWN. It only
//! moves through [`ConnectionState::reconcile`]. Observers receive
//! [`Snapshot`]s, never the live value.

mod connection;

pub use connection::{ConnectionState, Snapshot, Transition};
