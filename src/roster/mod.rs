// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The saved device list.
//!
//! A [`DeviceRoster`] holds the hostnames of the bulbs the user has kept,
//! persisted through a [`Store`](crate::store::Store). Discovery results are
//! merged into it one at a time, and a [`DeviceGroup`](crate::group::DeviceGroup)
//! is built from it when a group view opens.
//!
//! [`inspect_device`] and [`rename_device`] talk to a single bulb over a
//! short-lived connection, outside any group.

mod device_roster;
mod inspect;

pub use device_roster::{DeviceRecord, DeviceRoster, DiscoveredDevice};
pub use inspect::{inspect_device, rename_device};
