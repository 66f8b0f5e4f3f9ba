// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state formatting.
//!
//! Turns the raw properties of a bulb into a canonical [`DeviceStatus`] and
//! the display string used for each device row:
//!
//! | Power | Mode        | Text                                        |
//! |-------|-------------|---------------------------------------------|
//! | on    | RGB         | `<name> [<host>] - ON, (<r>, <g>, <b>), <bright>%` |
//! | on    | temperature | `<name> [<host>] - ON, <ct>K, <bright>%`    |
//! | off   | any         | `<name> [<host>] - OFF`                     |
//!
//! [`StatusBoard`] keeps the rows of a group keyed by hostname.

mod board;
mod status;

pub use board::{RowState, StatusBoard, StatusRow};
pub use status::{DeviceStatus, LightSetting, StatusLine, format_status};
