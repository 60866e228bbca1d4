// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for outlet control.
//!
//! - [`PowerState`] - On/Off as reported by the device
//! - [`OutputState`] - On/Off/Unknown as tracked by the panel
//! - [`PowerIndex`] - Relay index (1-8)

mod power;

pub use power::{OutputState, PowerIndex, PowerState};
