// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device groups for bulk control.
//!
//! A [`DeviceGroup`] is an ordered collection of device handles with unique
//! hostnames. It is the unit for connecting, reconnecting and issuing the
//! same command to many bulbs at once.
//!
//! # Best-effort bulk operations
//!
//! Every bulk operation runs independently on each member, concurrently.
//! A device that times out or is not connected never prevents the command
//! from reaching the others. Each operation returns a [`BulkReport`] with
//! one outcome per device; failures are also logged at `warn` level.
//!
//! # Examples
//!
//! ```no_run
//! # use yeegroup_lib::client::DeviceClient;
//! use yeegroup_lib::group::{DeviceGroup, Selection};
//! use yeegroup_lib::types::{Brightness, RgbColor};
//!
//! # async fn example<C: DeviceClient>(bulbs: Vec<C>) -> yeegroup_lib::Result<()> {
//! let group = DeviceGroup::new();
//! for bulb in bulbs {
//!     group.add_client(bulb).await;
//! }
//! group.connect().await;
//!
//! // Address only the checked bulbs
//! let selection = Selection::all(group.hostnames().await);
//! let checked = group.subset(&selection).await;
//! checked.turn_on().await;
//! checked.set_rgb_color(RgbColor::new(255, 120, 0)).await;
//!
//! let report = checked.set_brightness(Brightness::new(40)?).await;
//! for (hostname, error) in report.failures() {
//!     eprintln!("{hostname}: {error}");
//! }
//! # Ok(())
//! # }
//! ```

mod device_group;
mod report;
mod selection;

pub use device_group::DeviceGroup;
pub use report::{BulkReport, DeviceOutcome};
pub use selection::Selection;
