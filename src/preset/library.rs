// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cached preset list over a [`Store`].

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;

use crate::client::DeviceClient;
use crate::error::{ConfigurationError, Result};
use crate::group::{BulkReport, DeviceGroup};
use crate::store::Store;

use super::{Preset, apply, snapshot};

/// The saved presets, cached in memory.
///
/// The store owns the list. After every write the cache is reloaded from
/// the store (or, for deletes, replaced with the list the store returns),
/// so the cache never drifts from what was persisted.
///
/// Writes are serialized: each one reads the current list from the store,
/// modifies it and saves it while holding the write lock, so two concurrent
/// writes never lose each other's changes.
pub struct PresetLibrary<S> {
    store: Arc<S>,
    cache: Arc<RwLock<Vec<Preset>>>,
    writes: Arc<Mutex<()>>,
}

impl<S: Store<Preset>> PresetLibrary<S> {
    /// Creates a library with an empty cache. Call [`load`](Self::load) to
    /// fill it.
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
            cache: Arc::new(RwLock::new(Vec::new())),
            writes: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    // =========================================================================
    // Reading
    // =========================================================================

    /// Replaces the cache with the stored presets.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read. The cache is left
    /// unchanged.
    pub fn load(&self) -> Result<()> {
        let presets = self.store.load()?;
        tracing::debug!(count = presets.len(), "Presets loaded");
        *self.cache.write() = presets;
        Ok(())
    }

    /// Returns a copy of the cached presets.
    #[must_use]
    pub fn presets(&self) -> Vec<Preset> {
        self.cache.read().clone()
    }

    /// Returns the preset names in order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.cache.read().iter().map(|p| p.name.clone()).collect()
    }

    /// Returns the preset at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Preset> {
        self.cache.read().get(index).cloned()
    }

    /// Number of cached presets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    /// Returns `true` if no preset is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    // =========================================================================
    // Writing
    // =========================================================================

    /// Snapshots `group` into a new preset named `name` and saves it.
    ///
    /// Unreachable members are left out of the preset. The preset is
    /// appended to the list currently in the store.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::EmptyPresetName`] if `name` is empty,
    /// before any device is contacted, or a store error.
    pub async fn save_new<C: DeviceClient>(
        &self,
        name: &str,
        group: &DeviceGroup<C>,
    ) -> Result<Preset> {
        if name.is_empty() {
            return Err(ConfigurationError::EmptyPresetName.into());
        }

        let preset = snapshot(name, group).await;

        let _guard = self.writes.lock().await;
        let mut presets = self.store.load()?;
        presets.push(preset.clone());
        self.persist(&presets)?;

        tracing::info!(preset = %name, bulbs = preset.len(), "Preset saved");
        Ok(preset)
    }

    /// Renames the preset at `index`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `name` is empty or `index` does not
    /// exist, or a store error.
    pub async fn rename(&self, index: usize, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(ConfigurationError::EmptyPresetName.into());
        }

        let _guard = self.writes.lock().await;
        let mut presets = self.store.load()?;
        let len = presets.len();
        let preset = presets
            .get_mut(index)
            .ok_or(ConfigurationError::IndexOutOfRange { index, len })?;
        let previous = std::mem::replace(&mut preset.name, name.to_string());
        self.persist(&presets)?;

        tracing::info!(index, from = %previous, to = %name, "Preset renamed");
        Ok(())
    }

    /// Replaces the bulbs of the preset at `index` with a fresh snapshot of
    /// `group`. The name is kept.
    ///
    /// The slot is checked again once the snapshot completes. If the preset
    /// at `index` was deleted, renamed or modified meanwhile, nothing is
    /// written.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::IndexOutOfRange`] if `index` does not
    /// exist, [`ConfigurationError::PresetChanged`] if the slot changed
    /// during the snapshot, or a store error.
    pub async fn overwrite<C: DeviceClient>(
        &self,
        index: usize,
        group: &DeviceGroup<C>,
    ) -> Result<Preset> {
        let original = self.get(index).ok_or_else(|| ConfigurationError::IndexOutOfRange {
            index,
            len: self.len(),
        })?;

        let fresh = snapshot(original.name.as_str(), group).await;

        let _guard = self.writes.lock().await;
        let mut presets = self.store.load()?;
        if presets.get(index) != Some(&original) {
            tracing::warn!(index, preset = %original.name, "Preset changed during overwrite");
            *self.cache.write() = presets;
            return Err(ConfigurationError::PresetChanged { index }.into());
        }
        if let Some(slot) = presets.get_mut(index) {
            slot.bulbs.clone_from(&fresh.bulbs);
        }
        self.persist(&presets)?;

        tracing::info!(
            index,
            preset = %fresh.name,
            bulbs = fresh.len(),
            "Preset overwritten"
        );
        Ok(fresh)
    }

    /// Deletes the preset at `index`.
    ///
    /// The cache is replaced with the list the store returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the delete. The cache is left
    /// unchanged.
    pub async fn delete(&self, index: usize) -> Result<()> {
        let _guard = self.writes.lock().await;
        let remaining = self.store.delete_at(index)?;
        tracing::info!(index, remaining = remaining.len(), "Preset deleted");
        *self.cache.write() = remaining;
        Ok(())
    }

    /// Applies the preset at `index` to `group`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `index` does not exist. Device
    /// failures are reported in the returned [`BulkReport`].
    pub async fn apply<C: DeviceClient>(
        &self,
        index: usize,
        group: &DeviceGroup<C>,
    ) -> Result<BulkReport> {
        let preset = self.get(index).ok_or_else(|| ConfigurationError::IndexOutOfRange {
            index,
            len: self.len(),
        })?;
        Ok(apply(&preset, group).await)
    }

    /// Saves `presets` and reloads the cache. Callers hold `writes`.
    fn persist(&self, presets: &[Preset]) -> Result<()> {
        self.store.save(presets)?;
        self.load()
    }
}

impl<S> Clone for PresetLibrary<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
            writes: Arc::clone(&self.writes),
        }
    }
}

impl<S> std::fmt::Debug for PresetLibrary<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresetLibrary")
            .field("presets", &self.cache.read().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::client::Property;
    use crate::client::fake::FakeBulb;
    use crate::error::Error;
    use crate::store::MemoryStore;

    async fn group_with(bulbs: &[&FakeBulb]) -> DeviceGroup<FakeBulb> {
        let group = DeviceGroup::new();
        for bulb in bulbs {
            group.add_client((*bulb).clone()).await;
        }
        group.connect().await;
        group
    }

    fn library() -> (MemoryStore<Preset>, PresetLibrary<MemoryStore<Preset>>) {
        let store = MemoryStore::new();
        (store.clone(), PresetLibrary::new(store))
    }

    #[tokio::test]
    async fn save_new_persists_and_reloads() {
        let a = FakeBulb::rgb("a", "desk", 0x00FF_0000, 50);
        let group = group_with(&[&a]).await;
        let (store, library) = library();

        library.save_new("evening", &group).await.unwrap();

        assert_eq!(library.names(), vec!["evening"]);
        assert_eq!(store.load().unwrap(), library.presets());
    }

    #[tokio::test]
    async fn empty_name_is_rejected_before_contacting_devices() {
        let a = FakeBulb::rgb("a", "desk", 0, 50);
        let group = group_with(&[&a]).await;
        let (store, library) = library();
        let calls_before = a.calls().len();

        let err = library.save_new("", &group).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Configuration(ConfigurationError::EmptyPresetName)
        ));
        assert_eq!(a.calls().len(), calls_before);
        assert!(store.is_empty());
    }

    #[test]
    fn load_picks_up_external_changes() {
        let store = MemoryStore::with_items(vec![Preset::new("a", vec![])]);
        let library = PresetLibrary::new(store.clone());
        library.load().unwrap();
        assert_eq!(library.len(), 1);

        store.save(&[Preset::new("a", vec![]), Preset::new("b", vec![])]).unwrap();
        library.load().unwrap();
        assert_eq!(library.names(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn rename_changes_only_the_name() {
        let store = MemoryStore::with_items(vec![Preset::new("old", vec![])]);
        let library = PresetLibrary::new(store.clone());
        library.load().unwrap();

        library.rename(0, "new").await.unwrap();

        assert_eq!(store.load().unwrap()[0].name, "new");
        assert_eq!(library.names(), vec!["new"]);
    }

    #[tokio::test]
    async fn rename_rejects_empty_name_and_bad_index() {
        let store = MemoryStore::with_items(vec![Preset::new("old", vec![])]);
        let library = PresetLibrary::new(store);
        library.load().unwrap();

        assert!(library.rename(0, "").await.unwrap_err().is_configuration());
        assert!(library.rename(4, "x").await.unwrap_err().is_configuration());
        assert_eq!(library.names(), vec!["old"]);
    }

    #[tokio::test]
    async fn overwrite_replaces_bulbs_and_keeps_name() {
        let a = FakeBulb::rgb("a", "desk", 0x00FF_0000, 50);
        let group = group_with(&[&a]).await;
        let (_store, library) = library();
        library.save_new("evening", &group).await.unwrap();

        a.set_property(Property::Bright, "5");
        library.overwrite(0, &group).await.unwrap();

        let preset = library.get(0).unwrap();
        assert_eq!(preset.name, "evening");
        assert_eq!(preset.bulb("a").unwrap().brightness.value(), 5);
    }

    #[tokio::test]
    async fn delete_uses_remaining_list_from_store() {
        let store = MemoryStore::with_items(vec![
            Preset::new("a", vec![]),
            Preset::new("b", vec![]),
            Preset::new("c", vec![]),
        ]);
        let library = PresetLibrary::new(store);
        library.load().unwrap();

        library.delete(1).await.unwrap();

        assert_eq!(library.names(), vec!["a", "c"]);
    }

    #[tokio::test]
    async fn failed_delete_keeps_cache() {
        let store = MemoryStore::with_items(vec![Preset::new("a", vec![])]);
        let library = PresetLibrary::new(store);
        library.load().unwrap();

        assert!(library.delete(3).await.is_err());
        assert_eq!(library.len(), 1);
    }

    #[tokio::test]
    async fn apply_by_index() {
        let a = FakeBulb::rgb("a", "desk", 0x00FF_0000, 50);
        let group = group_with(&[&a]).await;
        let (_store, library) = library();
        library.save_new("red", &group).await.unwrap();

        a.set_property(Property::Rgb, "0");
        let report = library.apply(0, &group).await.unwrap();

        assert!(report.all_succeeded());
        assert_eq!(a.property(Property::Rgb).as_deref(), Some("16711680"));
        assert!(library.apply(9, &group).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn overwrite_of_a_slot_deleted_mid_snapshot_writes_nothing() {
        let a = FakeBulb::rgb("a", "desk", 0x00FF_0000, 50);
        let group = group_with(&[&a]).await;
        let store = MemoryStore::with_items(vec![
            Preset::new("A", vec![]),
            Preset::new("B", vec![]),
        ]);
        let library = PresetLibrary::new(store.clone());
        library.load().unwrap();
        a.set_fetch_delay(Duration::from_secs(5));

        let (overwritten, deleted) = tokio::join!(library.overwrite(0, &group), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            library.delete(0).await
        });

        deleted.unwrap();
        assert!(matches!(
            overwritten,
            Err(Error::Configuration(ConfigurationError::PresetChanged { index: 0 }))
        ));
        assert_eq!(store.load().unwrap(), vec![Preset::new("B", vec![])]);
        assert_eq!(library.names(), vec!["B"]);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_saves_keep_both_presets() {
        let a = FakeBulb::rgb("a", "desk", 0x00FF_0000, 50);
        let group = group_with(&[&a]).await;
        let (store, library) = library();
        a.set_fetch_delay(Duration::from_secs(1));

        let (first, second) = tokio::join!(
            library.save_new("first", &group),
            library.save_new("second", &group)
        );
        first.unwrap();
        second.unwrap();

        let mut names: Vec<String> = store.load().unwrap().into_iter().map(|p| p.name).collect();
        names.sort();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn rename_keeps_presets_added_to_the_store_externally() {
        let store = MemoryStore::with_items(vec![Preset::new("one", vec![])]);
        let library = PresetLibrary::new(store.clone());
        library.load().unwrap();

        store.save(&[Preset::new("one", vec![]), Preset::new("two", vec![])]).unwrap();
        library.rename(0, "first").await.unwrap();

        assert_eq!(library.names(), vec!["first", "two"]);
    }
}
