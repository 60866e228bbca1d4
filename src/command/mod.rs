// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tasmota power commands.
//!
//! The panel only speaks one command family: `Power{N} {Token}`, where the
//! token is one of `State`, `On`, `Off` or `Toggle`. Every variant answers
//! with the relay's resulting state, so the same response parser serves
//! queries and switching commands alike.

mod power;

pub use power::{PowerAction, PowerCommand};
