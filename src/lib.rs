// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `YeeGroup` Lib - A Rust library to control groups of smart bulbs.
//!
//! This library coordinates a set of networked bulbs as one control target.
//! The wire protocol stays outside: plug in any client that implements
//! [`DeviceClient`] and any persistence that implements [`Store`].
//!
//! # Supported Features
//!
//! - **Bulk control**: Power, RGB color, brightness and white temperature
//!   across a whole group or its checked subset, with per-device results
//! - **Lazy reconnection**: Disconnected bulbs are reconnected before each
//!   command and poll
//! - **Status polling**: A cancellable background poll keeps one display
//!   row per bulb up to date
//! - **Presets**: Capture the state of every bulb under a name and apply it
//!   back later
//! - **Device roster**: Merge discovery results into the saved device list
//!
//! # Quick Start
//!
//! ```no_run
//! use yeegroup_lib::{DeviceClient, DeviceGroup, GroupSession, MemoryStore, Preset, SessionConfig};
//! use yeegroup_lib::types::{Brightness, RgbColor};
//!
//! # async fn run<C: DeviceClient>(bulbs: Vec<C>) -> yeegroup_lib::Result<()> {
//! let group = DeviceGroup::new();
//! for bulb in bulbs {
//!     group.add_client(bulb).await;
//! }
//!
//! let store = MemoryStore::<Preset>::new();
//! let session = GroupSession::open(group, store, SessionConfig::default()).await?;
//!
//! // Commands reach every checked bulb; failures are reported per bulb
//! let report = session.set_color(RgbColor::new(255, 80, 0)).await;
//! for (hostname, error) in report.failures() {
//!     eprintln!("{hostname}: {error}");
//! }
//! session.set_brightness(Brightness::new(40)?).await;
//!
//! // Capture the current state and bring it back later
//! session.save_preset("evening").await?;
//! session.select_preset(0).await?;
//!
//! for row in session.status_rows() {
//!     println!("{}", row.text);
//! }
//!
//! session.close().await;
//! # Ok(())
//! # }
//! ```
//!
//! # Without a Session
//!
//! The building blocks work on their own:
//!
//! ```no_run
//! use std::time::Duration;
//! use yeegroup_lib::{DeviceClient, DeviceGroup};
//! use yeegroup_lib::poll::spawn_status_poll;
//! use yeegroup_lib::preset::{apply, snapshot};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run<C: DeviceClient>(group: DeviceGroup<C>) {
//! group.connect().await;
//!
//! let scene = snapshot("scene", &group).await;
//! group.turn_off().await;
//! apply(&scene, &group).await;
//!
//! let token = CancellationToken::new();
//! let poll = spawn_status_poll(group.clone(), Duration::from_secs(7), token, |update| {
//!     if let Ok(line) = update.result {
//!         println!("{line}");
//!     }
//! });
//! poll.shutdown().await;
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod format;
pub mod group;
pub mod poll;
pub mod preset;
pub mod roster;
pub mod session;
pub mod store;
pub mod types;

pub use client::{DeviceClient, DeviceHandle, Properties, Property};
pub use config::SessionConfig;
pub use error::{ConfigurationError, Error, Result, ValueError};
pub use event::{EventBus, GroupEvent};
pub use format::{DeviceStatus, StatusBoard, StatusLine, format_status};
pub use group::{BulkReport, DeviceGroup, DeviceOutcome, Selection};
pub use poll::{PollHandle, PollingScheduler};
pub use preset::{Bulb, Preset, PresetLibrary};
pub use roster::{DeviceRecord, DeviceRoster, DiscoveredDevice};
pub use session::GroupSession;
pub use store::{MemoryStore, Store};
pub use types::{Brightness, ColorMode, ColorTemperature, PowerState, RgbColor};
