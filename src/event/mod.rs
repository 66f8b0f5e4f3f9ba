// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system for group sessions.
//!
//! A [`GroupSession`](crate::session::GroupSession) publishes a
//! [`GroupEvent`] whenever a row's status changes, a device stops
//! answering, a command fails or the preset list changes. The [`EventBus`]
//! uses tokio's broadcast channel so any number of views can follow along.
//!
//! # Examples
//!
//! ```
//! use yeegroup_lib::event::{EventBus, GroupEvent};
//!
//! let bus = EventBus::new();
//!
//! // Subscribe to events
//! let mut rx = bus.subscribe();
//!
//! // Publish an event
//! bus.publish(GroupEvent::presets_changed(3));
//! ```

mod event_bus;
mod group_event;

pub use event_bus::{DEFAULT_CHANNEL_CAPACITY, EventBus};
pub use group_event::GroupEvent;
