// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Panel configuration.
//!
//! [`Settings`] mirrors the on-disk `config.json` and is deliberately
//! permissive; [`DeviceConfig`] is the validated, immutable view the core
//! works with. The language table lives in [`Translations`].

mod device;
mod lang;
mod settings;

pub use device::DeviceConfig;
pub use lang::Translations;
pub use settings::Settings;
