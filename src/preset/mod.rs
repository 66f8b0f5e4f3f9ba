// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Presets: named per-bulb settings that can be captured from a group and
//! applied back to it.
//!
//! - [`snapshot`] reads every member of a group into a [`Preset`].
//! - [`apply`] pushes a preset back onto the members it names.
//! - [`PresetLibrary`] keeps the saved presets in sync with a
//!   [`Store`](crate::store::Store).

mod applier;
mod library;
mod model;

pub use applier::{apply, snapshot};
pub use library::PresetLibrary;
pub use model::{Bulb, Preset};
