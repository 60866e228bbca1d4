// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Background machinery that keeps the state in sync with the device.
//!
//! - [`Reconciler`] owns the state and performs one query/apply/publish cycle
//!   at a time.
//! - [`Poller`] drives the reconciler on a timer.
//! - [`CommandDispatcher`] runs user commands off the caller's task and
//!   verifies each success with an extra reconciliation.
//! - [`Shutdown`] stops the poller.

mod dispatcher;
mod poller;
mod reconciler;
mod shutdown;

pub use dispatcher::CommandDispatcher;
pub use poller::Poller;
pub use reconciler::Reconciler;
pub use shutdown::{Shutdown, ShutdownSignal};
