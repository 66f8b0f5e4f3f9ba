// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Background polling.
//!
//! [`PollingScheduler`] runs any fallible async action on a fixed period
//! until cancelled. [`spawn_status_poll`] uses it to keep the displayed
//! status of a [`DeviceGroup`](crate::group::DeviceGroup) fresh.

mod refresh;
mod scheduler;

pub use refresh::{StatusUpdate, refresh_status, spawn_status_poll};
pub use scheduler::{DEFAULT_POLL_INTERVAL, PollHandle, PollingScheduler};
