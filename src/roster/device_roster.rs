// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Saved device records and discovery merging.

use std::sync::Arc;

use futures::{Stream, StreamExt};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::client::{DeviceClient, DeviceHandle};
use crate::error::{Error, Result};
use crate::group::DeviceGroup;
use crate::store::Store;

/// A saved device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeviceRecord {
    /// Hostname (or IP address) of the bulb.
    pub hostname: String,
}

impl DeviceRecord {
    /// Creates a record.
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
        }
    }
}

/// A bulb announced by network discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredDevice {
    /// Hostname (or IP address) the bulb answered from.
    pub hostname: String,
}

impl DiscoveredDevice {
    /// Creates a discovery event.
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
        }
    }
}

/// The saved device list, cached in memory over a [`Store`].
///
/// Hostnames are unique. Like the preset library, the cache is replaced with
/// what the store holds after each write.
pub struct DeviceRoster<S> {
    store: Arc<S>,
    records: Arc<RwLock<Vec<DeviceRecord>>>,
}

impl<S: Store<DeviceRecord>> DeviceRoster<S> {
    /// Creates a roster with an empty cache. Call [`load`](Self::load) to
    /// fill it.
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Replaces the cache with the stored records.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn load(&self) -> Result<()> {
        let records = self.store.load()?;
        tracing::debug!(count = records.len(), "Device roster loaded");
        *self.records.write() = records;
        Ok(())
    }

    /// Returns a copy of the cached records.
    #[must_use]
    pub fn records(&self) -> Vec<DeviceRecord> {
        self.records.read().clone()
    }

    /// Returns the saved hostnames in order.
    #[must_use]
    pub fn hostnames(&self) -> Vec<String> {
        self.records.read().iter().map(|r| r.hostname.clone()).collect()
    }

    /// Returns `true` if `hostname` is saved.
    #[must_use]
    pub fn contains(&self, hostname: &str) -> bool {
        self.records.read().iter().any(|r| r.hostname == hostname)
    }

    /// Number of saved devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns `true` if no device is saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Adds a discovered device to the cache unless its hostname is already
    /// known. Returns `true` if it was added.
    ///
    /// The cache is not persisted; see [`absorb`](Self::absorb).
    pub fn on_discovered(&self, device: &DiscoveredDevice) -> bool {
        let mut records = self.records.write();
        if records.iter().any(|r| r.hostname == device.hostname) {
            return false;
        }
        records.push(DeviceRecord::new(device.hostname.clone()));
        tracing::info!(hostname = %device.hostname, "Device discovered");
        true
    }

    /// Merges discovery events as they arrive, then saves the roster once
    /// the stream ends.
    ///
    /// Returns the hostnames that were new, in arrival order.
    ///
    /// # Errors
    ///
    /// Returns an error if the roster cannot be saved.
    pub async fn absorb<St>(&self, mut discovered: St) -> Result<Vec<String>>
    where
        St: Stream<Item = DiscoveredDevice> + Unpin,
    {
        let mut added = Vec::new();
        while let Some(device) = discovered.next().await {
            if self.on_discovered(&device) {
                added.push(device.hostname);
            }
        }

        self.store.save(&self.records())?;
        self.load()?;
        tracing::debug!(added = added.len(), total = self.len(), "Discovery finished");
        Ok(added)
    }

    /// Removes a saved device.
    ///
    /// The cache is replaced with the list the store returns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] if `hostname` is not saved, or a
    /// store error.
    pub fn remove(&self, hostname: &str) -> Result<()> {
        let index = self
            .records
            .read()
            .iter()
            .position(|r| r.hostname == hostname)
            .ok_or_else(|| Error::DeviceNotFound(hostname.to_string()))?;

        let remaining = self.store.delete_at(index)?;
        tracing::info!(%hostname, "Device removed from roster");
        *self.records.write() = remaining;
        Ok(())
    }

    /// Builds a group with one client per saved device, in roster order.
    pub fn build_group<C, F>(&self, mut factory: F) -> DeviceGroup<C>
    where
        C: DeviceClient,
        F: FnMut(&str) -> C,
    {
        DeviceGroup::from_handles(
            self.records
                .read()
                .iter()
                .map(|r| DeviceHandle::new(factory(&r.hostname))),
        )
    }
}

impl<S> Clone for DeviceRoster<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            records: Arc::clone(&self.records),
        }
    }
}

impl<S> std::fmt::Debug for DeviceRoster<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceRoster")
            .field("records", &*self.records.read())
            .finish_non_exhaustive()
    }
}
