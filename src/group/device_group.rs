// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ordered, de-duplicated collection of device handles.

use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::RwLock;

use crate::client::{DeviceClient, DeviceHandle};
use crate::error::Result;
use crate::types::{Brightness, ColorTemperature, PowerState, RgbColor};

use super::{BulkReport, DeviceOutcome, Selection};

/// Ordered collection of devices with unique hostnames.
///
/// Clones share the same member list, so the poll task and user commands
/// always see one consistent group. The list is guarded by an async
/// read-write lock; it is copied out before any device I/O, so no lock is
/// held while waiting on the network.
///
/// Members keep their insertion order. Lookup by hostname is a linear scan,
/// which is fine for the handful of bulbs in a room.
pub struct DeviceGroup<C> {
    members: Arc<RwLock<Vec<DeviceHandle<C>>>>,
}

impl<C: DeviceClient> DeviceGroup<C> {
    /// Creates an empty group.
    #[must_use]
    pub fn new() -> Self {
        Self {
            members: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Creates a group from handles, dropping later duplicates of a hostname.
    pub fn from_handles<I>(handles: I) -> Self
    where
        I: IntoIterator<Item = DeviceHandle<C>>,
    {
        let mut members: Vec<DeviceHandle<C>> = Vec::new();
        for handle in handles {
            if !members.iter().any(|m| m.hostname() == handle.hostname()) {
                members.push(handle);
            }
        }
        Self {
            members: Arc::new(RwLock::new(members)),
        }
    }

    // =========================================================================
    // Membership
    // =========================================================================

    /// Appends a device unless its hostname is already present.
    ///
    /// Returns `true` if the device was added, `false` for a duplicate.
    pub async fn add(&self, handle: DeviceHandle<C>) -> bool {
        let mut members = self.members.write().await;
        if members.iter().any(|m| m.hostname() == handle.hostname()) {
            tracing::debug!(hostname = %handle.hostname(), "Ignoring duplicate device");
            return false;
        }
        tracing::debug!(hostname = %handle.hostname(), "Device added to group");
        members.push(handle);
        true
    }

    /// Wraps a client in a handle and adds it.
    pub async fn add_client(&self, client: C) -> bool {
        self.add(DeviceHandle::new(client)).await
    }

    /// Removes a device by hostname, returning its handle.
    pub async fn remove(&self, hostname: &str) -> Option<DeviceHandle<C>> {
        let mut members = self.members.write().await;
        let index = members.iter().position(|m| m.hostname() == hostname)?;
        Some(members.remove(index))
    }

    /// Returns the handle for a hostname.
    pub async fn get(&self, hostname: &str) -> Option<DeviceHandle<C>> {
        self.members
            .read()
            .await
            .iter()
            .find(|m| m.hostname() == hostname)
            .cloned()
    }

    /// Returns `true` if a device with this hostname is a member.
    pub async fn contains(&self, hostname: &str) -> bool {
        self.members
            .read()
            .await
            .iter()
            .any(|m| m.hostname() == hostname)
    }

    /// Number of members.
    pub async fn len(&self) -> usize {
        self.members.read().await.len()
    }

    /// Returns `true` if the group has no members.
    pub async fn is_empty(&self) -> bool {
        self.members.read().await.is_empty()
    }

    /// Snapshot of the members in insertion order.
    pub async fn members(&self) -> Vec<DeviceHandle<C>> {
        self.members.read().await.clone()
    }

    /// Hostnames of the members in insertion order.
    pub async fn hostnames(&self) -> Vec<String> {
        self.members
            .read()
            .await
            .iter()
            .map(|m| m.hostname().to_string())
            .collect()
    }

    /// Returns a new group holding the checked members, in group order.
    ///
    /// The subset shares device handles with this group but has its own
    /// member list.
    pub async fn subset(&self, selection: &Selection) -> Self {
        let members = self
            .members
            .read()
            .await
            .iter()
            .filter(|m| selection.is_checked(m.hostname()))
            .cloned()
            .collect();
        Self {
            members: Arc::new(RwLock::new(members)),
        }
    }

    // =========================================================================
    // Connection Management
    // =========================================================================

    /// Connects every member.
    pub async fn connect(&self) -> BulkReport {
        self.run_bulk("connect", |handle| async move { handle.connect().await })
            .await
    }

    /// Disconnects every member.
    pub async fn disconnect(&self) -> BulkReport {
        self.run_bulk("disconnect", |handle| async move { handle.disconnect().await })
            .await
    }

    /// Connects every member that is not connected.
    ///
    /// The report lists only the devices a connect was attempted on.
    pub async fn reconnect_if_needed(&self) -> BulkReport {
        let members = self.members().await;
        let attempts = join_all(members.into_iter().map(|handle| async move {
            let hostname = handle.hostname().to_string();
            match handle.connect_if_needed().await {
                Ok(false) => None,
                Ok(true) => Some(DeviceOutcome {
                    hostname,
                    result: Ok(()),
                }),
                Err(e) => Some(DeviceOutcome {
                    hostname,
                    result: Err(e),
                }),
            }
        }))
        .await;

        let report = BulkReport::new("reconnect", attempts.into_iter().flatten().collect());
        log_failures(&report);
        if !report.is_empty() {
            tracing::debug!(
                attempted = report.len(),
                failed = report.failure_count(),
                "Reconnect pass finished"
            );
        }
        report
    }

    // =========================================================================
    // Bulk Commands
    // =========================================================================

    /// Turns every member on.
    pub async fn turn_on(&self) -> BulkReport {
        self.set_power(PowerState::On).await
    }

    /// Turns every member off.
    pub async fn turn_off(&self) -> BulkReport {
        self.set_power(PowerState::Off).await
    }

    /// Sets the power state of every member.
    pub async fn set_power(&self, power: PowerState) -> BulkReport {
        self.run_bulk("set_power", move |handle| async move {
            handle.set_power(power).await
        })
        .await
    }

    /// Sets the RGB color of every member.
    pub async fn set_rgb_color(&self, color: RgbColor) -> BulkReport {
        self.run_bulk("set_rgb", move |handle| async move {
            handle.set_rgb(color).await
        })
        .await
    }

    /// Sets the brightness of every member.
    pub async fn set_brightness(&self, brightness: Brightness) -> BulkReport {
        self.run_bulk("set_brightness", move |handle| async move {
            handle.set_brightness(brightness).await
        })
        .await
    }

    /// Sets the white temperature of every member.
    pub async fn set_color_temperature(&self, temperature: ColorTemperature) -> BulkReport {
        self.run_bulk("set_color_temperature", move |handle| async move {
            handle.set_color_temperature(temperature).await
        })
        .await
    }

    /// Runs `op` on every member concurrently and collects the outcomes in
    /// group order.
    async fn run_bulk<F, Fut>(&self, operation: &'static str, op: F) -> BulkReport
    where
        F: Fn(DeviceHandle<C>) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let members = self.members().await;
        let outcomes = join_all(members.into_iter().map(|handle| {
            let hostname = handle.hostname().to_string();
            let call = op(handle);
            async move {
                DeviceOutcome {
                    hostname,
                    result: call.await,
                }
            }
        }))
        .await;

        let report = BulkReport::new(operation, outcomes);
        log_failures(&report);
        report
    }
}

fn log_failures(report: &BulkReport) {
    for (hostname, error) in report.failures() {
        tracing::warn!(
            operation = report.operation(),
            %hostname,
            error = %error,
            "Device operation failed"
        );
    }
}

impl<C: DeviceClient> Default for DeviceGroup<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for DeviceGroup<C> {
    fn clone(&self) -> Self {
        Self {
            members: Arc::clone(&self.members),
        }
    }
}

impl<C> std::fmt::Debug for DeviceGroup<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceGroup").finish_non_exhaustive()
    }
}
