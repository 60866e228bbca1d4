// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tasmota Panel - control one output of a Tasmota device over HTTP.
//!
//! The crate keeps a local view of a single relay in sync with the device
//! and lets a front-end switch it. It polls the device's `/cm` endpoint,
//! tracks whether the device is reachable, writes a timestamped event log
//! and runs user commands without blocking the caller.
//!
//! # Features
//!
//! - **Status polling**: periodic `Power{N}` queries with a 4 s timeout
//! - **Power control**: on, off and toggle with immediate verification
//! - **Connection tracking**: online/offline with the last known output
//! - **Event log**: optional append-only log file per session
//! - **Localisation**: status labels loaded from a language file
//!
//! # Quick Start
//!
//! ```no_run
//! use tasmota_panel::{DeviceConfig, EventLog, Panel, PanelEvent};
//!
//! #[tokio::main]
//! async fn main() -> tasmota_panel::Result<()> {
//!     let config = DeviceConfig::new("192.168.1.100")
//!         .with_credentials("admin", "secret")
//!         .with_poll_interval_secs(5);
//!
//!     let panel = Panel::start(config, EventLog::disabled())?;
//!     let mut events = panel.subscribe();
//!
//!     panel.toggle()?;
//!
//!     if let Ok(PanelEvent::CommandFailed { reason, .. }) = events.recv().await {
//!         eprintln!("command failed: {reason}");
//!     }
//!
//!     println!("output is {}", panel.snapshot().output());
//!     panel.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! # Building URLs only
//!
//! ```
//! use tasmota_panel::{DeviceConfig, PowerAction, build_command_url};
//!
//! let config = DeviceConfig::new("192.168.1.100");
//! assert_eq!(
//!     build_command_url(&config, PowerAction::On),
//!     "http://192.168.1.100/cm?cmnd=Power1%20On"
//! );
//! ```

pub mod command;
pub mod config;
pub mod control;
pub mod display;
pub mod error;
pub mod event;
pub mod event_log;
pub mod panel;
pub mod protocol;
pub mod response;
pub mod state;
pub mod types;

pub use command::{PowerAction, PowerCommand};
pub use config::{DeviceConfig, Settings, Translations};
pub use control::{CommandDispatcher, Poller, Reconciler, Shutdown, ShutdownSignal};
pub use display::{StatusView, Tone};
pub use error::{ConfigError, Error, ProtocolError, Result, TransportError, ValueError};
pub use event::{EventBus, PanelEvent};
pub use event_log::{EventLog, LogEvent};
pub use panel::Panel;
pub use protocol::{CommandResponse, HttpClient, build_command_url};
pub use response::PowerResponse;
pub use state::{ConnectionState, Snapshot, Transition};
pub use types::{OutputState, PowerIndex, PowerState};
