// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! An open group view.
//!
//! [`GroupSession`] ties together everything a control panel for a set of
//! bulbs needs: the group itself, which rows are checked, the status text of
//! every row (kept fresh by a background poll), the saved presets and an
//! event stream describing what changed.
//!
//! # Examples
//!
//! ```no_run
//! use yeegroup_lib::client::DeviceClient;
//! use yeegroup_lib::config::SessionConfig;
//! use yeegroup_lib::group::DeviceGroup;
//! use yeegroup_lib::preset::Preset;
//! use yeegroup_lib::session::GroupSession;
//! use yeegroup_lib::store::MemoryStore;
//! use yeegroup_lib::types::RgbColor;
//!
//! # async fn example<C: DeviceClient>(clients: Vec<C>) -> yeegroup_lib::Result<()> {
//! let group = DeviceGroup::new();
//! for client in clients {
//!     group.add_client(client).await;
//! }
//!
//! let store = MemoryStore::<Preset>::new();
//! let session = GroupSession::open(group, store, SessionConfig::default()).await?;
//! let mut events = session.subscribe();
//!
//! session.set_color(RgbColor::new(255, 120, 0)).await;
//! session.save_preset("sunset").await?;
//!
//! while let Ok(event) = events.try_recv() {
//!     println!("{event:?}");
//! }
//!
//! session.close().await;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::client::{DeviceClient, DeviceHandle};
use crate::config::SessionConfig;
use crate::error::{ConfigurationError, Result};
use crate::event::{EventBus, GroupEvent};
use crate::format::{StatusBoard, StatusRow};
use crate::group::{BulkReport, DeviceGroup, Selection};
use crate::poll::{PollHandle, StatusUpdate, refresh_status, spawn_status_poll};
use crate::preset::{Preset, PresetLibrary};
use crate::roster::{DeviceRecord, DeviceRoster};
use crate::store::Store;
use crate::types::{Brightness, ColorTemperature, PowerState, RgbColor};

/// An open view over a device group.
///
/// Bulk commands reconnect any disconnected member first and then reach
/// only the checked members. Presets are captured from and applied to the
/// whole group.
///
/// Dropping the session stops polling. Use [`close`](Self::close) to also
/// disconnect the devices.
pub struct GroupSession<C, S> {
    group: DeviceGroup<C>,
    presets: PresetLibrary<S>,
    selection: Arc<RwLock<Selection>>,
    selected_preset: Mutex<Option<usize>>,
    board: Arc<RwLock<StatusBoard>>,
    events: EventBus,
    config: SessionConfig,
    poll: PollHandle,
}

impl<C, S> GroupSession<C, S>
where
    C: DeviceClient,
    S: Store<Preset>,
{
    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Opens a session over `group`.
    ///
    /// Loads the saved presets, connects every member (when
    /// [`SessionConfig::connect_on_open`] is set), checks every row and
    /// starts polling. Members that fail to connect are retried by the
    /// first poll.
    ///
    /// # Errors
    ///
    /// Returns an error if the presets cannot be loaded. No device is
    /// contacted in that case.
    pub async fn open(
        group: DeviceGroup<C>,
        preset_store: S,
        config: SessionConfig,
    ) -> Result<Self> {
        let presets = PresetLibrary::new(preset_store);
        presets.load()?;

        if config.connect_on_open {
            group.connect().await;
        }

        let hostnames = group.hostnames().await;
        let board = Arc::new(RwLock::new(StatusBoard::new(hostnames.iter().cloned())));
        let selection = Arc::new(RwLock::new(Selection::all(hostnames.iter().cloned())));
        let events = EventBus::with_capacity(config.event_capacity);

        let poll = spawn_status_poll(
            group.clone(),
            config.poll_interval,
            CancellationToken::new(),
            {
                let board = Arc::clone(&board);
                let events = events.clone();
                move |update| record_update(&board, &events, update)
            },
        );

        tracing::info!(
            devices = hostnames.len(),
            presets = presets.len(),
            interval = ?config.poll_interval,
            "Group session opened"
        );

        Ok(Self {
            group,
            presets,
            selection,
            selected_preset: Mutex::new(None),
            board,
            events,
            config,
            poll,
        })
    }

    /// Opens a session over the devices saved in `roster`, creating one
    /// client per hostname with `factory`.
    ///
    /// # Errors
    ///
    /// Returns an error if the presets cannot be loaded.
    pub async fn open_roster<R, F>(
        roster: &DeviceRoster<R>,
        factory: F,
        preset_store: S,
        config: SessionConfig,
    ) -> Result<Self>
    where
        R: Store<DeviceRecord>,
        F: FnMut(&str) -> C,
    {
        Self::open(roster.build_group(factory), preset_store, config).await
    }

    /// Stops polling, waits for an in-flight poll to finish and disconnects
    /// every member.
    pub async fn close(self) {
        self.poll.shutdown().await;
        let report = self.group.disconnect().await;
        self.events.publish(GroupEvent::SessionClosed);
        tracing::info!(
            devices = report.len(),
            failed = report.failure_count(),
            "Group session closed"
        );
    }

    /// Returns `true` while the background poll is running.
    #[must_use]
    pub fn is_polling(&self) -> bool {
        !self.poll.is_cancelled() && !self.poll.is_finished()
    }

    /// Refreshes every row now, outside the poll schedule.
    pub async fn refresh_now(&self) {
        for update in refresh_status(&self.group).await {
            record_update(&self.board, &self.events, update);
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The whole group.
    #[must_use]
    pub fn group(&self) -> &DeviceGroup<C> {
        &self.group
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The event bus of this session.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Subscribes to session events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<GroupEvent> {
        self.events.subscribe()
    }

    /// The display rows in group order.
    #[must_use]
    pub fn status_rows(&self) -> Vec<StatusRow> {
        self.board.read().rows().to_vec()
    }

    /// The displayed text for a hostname.
    #[must_use]
    pub fn status_text(&self, hostname: &str) -> Option<String> {
        self.board.read().text(hostname).map(str::to_string)
    }

    // =========================================================================
    // Membership
    // =========================================================================

    /// Adds a device to the group, checked, with an `Unknown` row.
    ///
    /// Returns `false` if a device with the same hostname is already a
    /// member. The device is connected by the next poll or command.
    pub async fn add_device(&self, client: C) -> bool {
        let handle = DeviceHandle::new(client);
        let hostname = handle.hostname().to_string();
        if !self.group.add(handle).await {
            return false;
        }
        self.selection.write().check(hostname);
        self.sync_board().await;
        true
    }

    /// Removes a device from the group and disconnects it.
    ///
    /// Returns `false` if no member has this hostname.
    pub async fn remove_device(&self, hostname: &str) -> bool {
        let Some(handle) = self.group.remove(hostname).await else {
            return false;
        };
        self.selection.write().uncheck(hostname);
        self.sync_board().await;
        if let Err(e) = handle.disconnect().await {
            tracing::debug!(%hostname, error = %e, "Disconnect of removed device failed");
        }
        true
    }

    async fn sync_board(&self) {
        let hostnames = self.group.hostnames().await;
        self.board.write().sync_members(hostnames);
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Returns a copy of the checked set.
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection.read().clone()
    }

    /// Replaces the checked set.
    pub fn set_selection(&self, selection: Selection) {
        *self.selection.write() = selection;
    }

    /// Checks or unchecks one device.
    pub fn set_checked(&self, hostname: &str, checked: bool) {
        self.selection.write().set(hostname, checked);
    }

    /// Checks every member.
    pub async fn check_all(&self) {
        let hostnames = self.group.hostnames().await;
        *self.selection.write() = Selection::all(hostnames);
    }

    // =========================================================================
    // Bulk Commands
    // =========================================================================

    /// Turns the checked devices on.
    pub async fn turn_on(&self) -> BulkReport {
        self.set_power(PowerState::On).await
    }

    /// Turns the checked devices off.
    pub async fn turn_off(&self) -> BulkReport {
        self.set_power(PowerState::Off).await
    }

    /// Sets the power state of the checked devices.
    pub async fn set_power(&self, power: PowerState) -> BulkReport {
        let report = self.targets().await.set_power(power).await;
        self.publish_failures(&report);
        report
    }

    /// Sets the RGB color of the checked devices.
    pub async fn set_color(&self, color: RgbColor) -> BulkReport {
        let report = self.targets().await.set_rgb_color(color).await;
        self.publish_failures(&report);
        report
    }

    /// Sets the brightness of the checked devices.
    pub async fn set_brightness(&self, brightness: Brightness) -> BulkReport {
        let report = self.targets().await.set_brightness(brightness).await;
        self.publish_failures(&report);
        report
    }

    /// Sets the white temperature of the checked devices.
    pub async fn set_temperature(&self, temperature: ColorTemperature) -> BulkReport {
        let report = self.targets().await.set_color_temperature(temperature).await;
        self.publish_failures(&report);
        report
    }

    /// Switches the checked devices to the configured white temperature.
    pub async fn set_white(&self) -> BulkReport {
        self.set_temperature(self.config.white_temperature).await
    }

    /// Reconnects disconnected members, then returns the checked subset.
    async fn targets(&self) -> DeviceGroup<C> {
        self.group.reconnect_if_needed().await;
        let selection = self.selection();
        self.group.subset(&selection).await
    }

    fn publish_failures(&self, report: &BulkReport) {
        for (hostname, error) in report.failures() {
            self.events.publish(GroupEvent::command_failed(
                hostname,
                report.operation(),
                error.to_string(),
            ));
        }
    }

    // =========================================================================
    // Presets
    // =========================================================================

    /// Returns the saved presets.
    #[must_use]
    pub fn presets(&self) -> Vec<Preset> {
        self.presets.presets()
    }

    /// Returns the saved preset names.
    #[must_use]
    pub fn preset_names(&self) -> Vec<String> {
        self.presets.names()
    }

    /// Index of the selected preset, if any.
    #[must_use]
    pub fn selected_preset(&self) -> Option<usize> {
        *self.selected_preset.lock()
    }

    /// Selects the preset at `index` and applies it to the whole group,
    /// reconnecting disconnected members first.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `index` does not exist. Device
    /// failures are reported in the returned [`BulkReport`].
    pub async fn select_preset(&self, index: usize) -> Result<BulkReport> {
        let preset = self
            .presets
            .get(index)
            .ok_or(ConfigurationError::IndexOutOfRange {
                index,
                len: self.presets.len(),
            })?;
        *self.selected_preset.lock() = Some(index);

        self.group.reconnect_if_needed().await;
        let report = crate::preset::apply(&preset, &self.group).await;

        self.publish_failures(&report);
        self.events.publish(GroupEvent::PresetApplied {
            name: preset.name,
            applied: report.len(),
        });
        Ok(report)
    }

    /// Clears the preset selection.
    pub fn deselect_preset(&self) {
        *self.selected_preset.lock() = None;
    }

    /// Saves the current state of the whole group as a new preset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::EmptyPresetName`] if `name` is empty,
    /// or a store error.
    pub async fn save_preset(&self, name: &str) -> Result<Preset> {
        let preset = self.presets.save_new(name, &self.group).await?;
        self.presets_changed();
        Ok(preset)
    }

    /// Renames the selected preset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::NoPresetSelected`] if no preset is
    /// selected, [`ConfigurationError::EmptyPresetName`] if `name` is empty,
    /// or a store error.
    pub async fn rename_preset(&self, name: &str) -> Result<()> {
        let index = self.require_selected()?;
        self.presets.rename(index, name).await?;
        self.presets_changed();
        Ok(())
    }

    /// Replaces the bulbs of the selected preset with the current state of
    /// the whole group.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::NoPresetSelected`] if no preset is
    /// selected, [`ConfigurationError::PresetChanged`] if the preset list
    /// changed while the group was being read, or a store error.
    pub async fn overwrite_preset(&self) -> Result<Preset> {
        let index = self.require_selected()?;
        let result = self.presets.overwrite(index, &self.group).await;
        if result.is_ok() || matches!(&result, Err(e) if e.is_configuration()) {
            self.presets_changed();
        }
        result
    }

    /// Deletes the selected preset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::NoPresetSelected`] if no preset is
    /// selected, or a store error.
    pub async fn delete_preset(&self) -> Result<()> {
        let index = self.require_selected()?;
        self.presets.delete(index).await?;
        self.presets_changed();
        Ok(())
    }

    fn require_selected(&self) -> Result<usize> {
        self.selected_preset()
            .ok_or_else(|| ConfigurationError::NoPresetSelected.into())
    }

    /// The list was reloaded, so indices may have shifted.
    fn presets_changed(&self) {
        *self.selected_preset.lock() = None;
        self.events
            .publish(GroupEvent::presets_changed(self.presets.len()));
    }
}

impl<C, S> std::fmt::Debug for GroupSession<C, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupSession")
            .field("config", &self.config)
            .field("rows", &self.board.read().len())
            .field("selected_preset", &*self.selected_preset.lock())
            .finish_non_exhaustive()
    }
}

/// Applies one refresh result to the board and announces what changed.
fn record_update(board: &RwLock<StatusBoard>, events: &EventBus, update: StatusUpdate) {
    let event = {
        let mut board = board.write();
        let previous = board.row(&update.hostname).cloned();
        let Some(row) = board.apply(&update.hostname, &update.result) else {
            return;
        };
        let changed = previous.is_none_or(|p| p.text != row.text || p.state != row.state);

        match &update.result {
            Ok(line) if changed => Some(GroupEvent::status_updated(
                &update.hostname,
                row.text.clone(),
                line.status,
            )),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(hostname = %update.hostname, error = %e, "Device unreachable");
                changed.then(|| GroupEvent::unreachable(&update.hostname, e.to_string()))
            }
        }
    };

    if let Some(event) = event {
        events.publish(event);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::client::Property;
    use crate::client::fake::FakeBulb;
    use crate::error::Error;
    use crate::format::RowState;
    use crate::store::MemoryStore;

    type TestSession = GroupSession<FakeBulb, MemoryStore<Preset>>;

    async fn open(bulbs: &[&FakeBulb]) -> TestSession {
        let group = DeviceGroup::new();
        for bulb in bulbs {
            group.add_client((*bulb).clone()).await;
        }
        GroupSession::open(group, MemoryStore::new(), SessionConfig::default())
            .await
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn open_connects_checks_all_and_polls() {
        let a = FakeBulb::rgb("a", "desk", 0x00FF_0000, 50);
        let b = FakeBulb::ct("b", "shelf", 4000, 80);
        let session = open(&[&a, &b]).await;

        assert!(a.connected() && b.connected());
        assert_eq!(session.selection().len(), 2);
        assert!(session.is_polling());

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(
            session.status_text("a").as_deref(),
            Some("desk [a] - ON, (255, 0, 0), 50%")
        );
        assert_eq!(
            session.status_text("b").as_deref(),
            Some("shelf [b] - ON, 4000K, 80%")
        );

        session.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn commands_reach_only_checked_devices() {
        let a = FakeBulb::rgb("a", "desk", 0, 50);
        let b = FakeBulb::rgb("b", "shelf", 0, 50);
        let session = open(&[&a, &b]).await;
        session.set_checked("b", false);

        let report = session.turn_off().await;

        assert_eq!(report.len(), 1);
        assert_eq!(a.property(Property::Power).as_deref(), Some("off"));
        assert_eq!(b.property(Property::Power).as_deref(), Some("on"));
        session.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn commands_reconnect_first() {
        let a = FakeBulb::rgb("a", "desk", 0, 50);
        let session = open(&[&a]).await;
        a.force_disconnected();

        let report = session.set_brightness(Brightness::clamped(20)).await;

        assert!(report.all_succeeded());
        assert_eq!(a.property(Property::Bright).as_deref(), Some("20"));
        session.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn white_uses_configured_temperature() {
        let a = FakeBulb::rgb("a", "desk", 0, 50);
        let session = open(&[&a]).await;

        session.set_white().await;

        assert_eq!(a.property(Property::Ct).as_deref(), Some("4000"));
        assert_eq!(a.property(Property::ColorMode).as_deref(), Some("2"));
        session.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn command_failures_are_published() {
        let a = FakeBulb::rgb("a", "desk", 0, 50);
        let session = open(&[&a]).await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        let mut events = session.subscribe();
        a.set_fail_commands(true);

        session.set_color(RgbColor::new(0, 255, 0)).await;

        let event = events.recv().await.unwrap();
        assert_eq!(
            event,
            GroupEvent::command_failed("a", "set_rgb", "set_rgb on a failed: timeout")
        );
        session.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn unreachable_device_keeps_its_text() {
        let a = FakeBulb::rgb("a", "desk", 0, 50);
        let session = open(&[&a]).await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        let before = session.status_text("a");
        let mut events = session.subscribe();

        a.set_fail_fetch(true);
        tokio::time::sleep(Duration::from_secs(7)).await;

        assert_eq!(session.status_text("a"), before);
        assert_eq!(session.status_rows()[0].state, RowState::Unreachable);
        assert!(events.recv().await.unwrap().is_failure());
        session.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn preset_lifecycle() {
        let a = FakeBulb::rgb("a", "desk", 0x00FF_0000, 50);
        let session = open(&[&a]).await;

        assert!(matches!(
            session.save_preset("").await,
            Err(Error::Configuration(ConfigurationError::EmptyPresetName))
        ));
        session.save_preset("red").await.unwrap();
        assert_eq!(session.preset_names(), vec!["red"]);

        assert!(matches!(
            session.rename_preset("x").await,
            Err(Error::Configuration(ConfigurationError::NoPresetSelected))
        ));

        session.set_color(RgbColor::new(0, 0, 255)).await;
        session.select_preset(0).await.unwrap();
        assert_eq!(a.property(Property::Rgb).as_deref(), Some("16711680"));
        assert_eq!(session.selected_preset(), Some(0));

        session.rename_preset("crimson").await.unwrap();
        assert_eq!(session.preset_names(), vec!["crimson"]);
        assert_eq!(session.selected_preset(), None);

        session.select_preset(0).await.unwrap();
        session.delete_preset().await.unwrap();
        assert!(session.presets().is_empty());

        session.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn overwrite_keeps_name_and_takes_fresh_state() {
        let a = FakeBulb::rgb("a", "desk", 0x00FF_0000, 50);
        let session = open(&[&a]).await;
        session.save_preset("scene").await.unwrap();
        session.select_preset(0).await.unwrap();

        session.set_brightness(Brightness::clamped(10)).await;
        let preset = session.overwrite_preset().await.unwrap();

        assert_eq!(preset.name, "scene");
        assert_eq!(preset.bulb("a").unwrap().brightness.value(), 10);
        session.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn overwrite_rejected_when_preset_deleted_meanwhile() {
        let a = FakeBulb::rgb("a", "desk", 0x00FF_0000, 50);
        let session = open(&[&a]).await;
        session.save_preset("A").await.unwrap();
        session.save_preset("B").await.unwrap();
        session.select_preset(0).await.unwrap();
        a.set_fetch_delay(Duration::from_secs(5));

        let (overwritten, deleted) = tokio::join!(session.overwrite_preset(), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            session.presets.delete(0).await
        });

        deleted.unwrap();
        assert!(matches!(
            overwritten,
            Err(Error::Configuration(ConfigurationError::PresetChanged { index: 0 }))
        ));
        assert_eq!(session.preset_names(), vec!["B"]);
        assert_eq!(session.selected_preset(), None);
        session.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn membership_changes_follow_rows_and_selection() {
        let a = FakeBulb::rgb("a", "desk", 0, 50);
        let session = open(&[&a]).await;

        assert!(session.add_device(FakeBulb::ct("b", "shelf", 3000, 40)).await);
        assert!(!session.add_device(FakeBulb::ct("b", "dup", 3000, 40)).await);
        assert!(session.selection().is_checked("b"));
        assert_eq!(session.status_rows().len(), 2);

        assert!(session.remove_device("a").await);
        assert!(!a.connected());
        assert_eq!(session.status_rows().len(), 1);
        assert!(!session.selection().is_checked("a"));
        session.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn close_stops_polling_and_disconnects() {
        let a = FakeBulb::rgb("a", "desk", 0, 50);
        let session = open(&[&a]).await;
        let mut events = session.subscribe();

        session.close().await;
        let polls = a.calls().iter().filter(|c| *c == "get_all_properties").count();
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert!(!a.connected());
        assert_eq!(
            a.calls().iter().filter(|c| *c == "get_all_properties").count(),
            polls
        );
        let mut last = None;
        while let Ok(event) = events.try_recv() {
            last = Some(event);
        }
        assert_eq!(last, Some(GroupEvent::SessionClosed));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_session_is_usable() {
        let session = open(&[]).await;
        assert!(session.turn_on().await.is_empty());
        assert!(session.status_rows().is_empty());
        let preset = session.save_preset("nothing").await.unwrap();
        assert!(preset.is_empty());
        session.close().await;
    }
}
