// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Periodic status refresh for a device group.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;

use crate::client::DeviceClient;
use crate::error::{Error, Result};
use crate::format::StatusLine;
use crate::group::DeviceGroup;

use super::{PollHandle, PollingScheduler};

/// Result of refreshing one device.
#[derive(Debug)]
pub struct StatusUpdate {
    /// Hostname of the refreshed device.
    pub hostname: String,
    /// Formatted status, or why it could not be read.
    pub result: Result<StatusLine>,
}

impl StatusUpdate {
    /// Returns `true` if the device answered with a usable state.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Refreshes the status of every member of `group`.
///
/// Disconnected members get one reconnect attempt first, then all members
/// are queried concurrently. The updates come back in group order, one per
/// member, each carrying its own hostname.
pub async fn refresh_status<C: DeviceClient>(group: &DeviceGroup<C>) -> Vec<StatusUpdate> {
    group.reconnect_if_needed().await;

    let members = group.members().await;
    let updates = join_all(members.into_iter().map(|handle| async move {
        let hostname = handle.hostname().to_string();
        let result = match handle.properties().await {
            Ok(properties) => {
                StatusLine::from_properties(hostname.clone(), &properties).map_err(Error::from)
            }
            Err(e) => Err(e),
        };
        StatusUpdate { hostname, result }
    }))
    .await;

    for update in &updates {
        if let Err(e) = &update.result {
            tracing::debug!(hostname = %update.hostname, error = %e, "Status refresh failed");
        }
    }
    updates
}

/// Starts polling the status of `group` every `interval`.
///
/// `on_update` is called once per member after each refresh. Results of a
/// refresh that finishes after `token` was cancelled are discarded.
pub fn spawn_status_poll<C, F>(
    group: DeviceGroup<C>,
    interval: Duration,
    token: CancellationToken,
    on_update: F,
) -> PollHandle
where
    C: DeviceClient,
    F: Fn(StatusUpdate) + Send + Sync + 'static,
{
    let on_update = Arc::new(on_update);
    let discard = token.clone();

    PollingScheduler::new(interval)
        .with_cancellation(token)
        .start(move || {
            let group = group.clone();
            let on_update = Arc::clone(&on_update);
            let discard = discard.clone();
            async move {
                let updates = refresh_status(&group).await;
                if discard.is_cancelled() {
                    tracing::debug!("Discarding refresh finished after cancellation");
                    return Ok(());
                }
                for update in updates {
                    on_update(update);
                }
                Ok(())
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::FakeBulb;
    use crate::client::{DeviceHandle, Property};

    async fn group_of(bulbs: &[&FakeBulb]) -> DeviceGroup<FakeBulb> {
        let group = DeviceGroup::new();
        for bulb in bulbs {
            group.add_client((*bulb).clone()).await;
        }
        group
    }

    #[tokio::test]
    async fn refresh_formats_each_member() {
        let a = FakeBulb::rgb("a", "desk", 0x00FF_0000, 50);
        let b = FakeBulb::ct("b", "shelf", 4000, 80);
        let group = group_of(&[&a, &b]).await;
        group.connect().await;

        let updates = refresh_status(&group).await;

        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].hostname, "a");
        assert_eq!(
            updates[0].result.as_ref().unwrap().to_string(),
            "desk [a] - ON, (255, 0, 0), 50%"
        );
        assert_eq!(
            updates[1].result.as_ref().unwrap().to_string(),
            "shelf [b] - ON, 4000K, 80%"
        );
    }

    #[tokio::test]
    async fn refresh_reconnects_disconnected_members() {
        let a = FakeBulb::rgb("a", "desk", 0, 10);
        let group = group_of(&[&a]).await;

        let updates = refresh_status(&group).await;

        assert!(a.connected());
        assert!(updates[0].is_ok());
    }

    #[tokio::test]
    async fn one_failure_does_not_hide_the_others() {
        let a = FakeBulb::rgb("a", "desk", 0, 10).failing_connect();
        let b = FakeBulb::ct("b", "shelf", 2700, 20);
        let group = group_of(&[&a, &b]).await;

        let updates = refresh_status(&group).await;

        assert!(!updates[0].is_ok());
        assert!(updates[1].is_ok());
    }

    #[tokio::test]
    async fn invalid_properties_are_reported_per_device() {
        let a = FakeBulb::rgb("a", "desk", 0, 10);
        a.set_property(Property::Bright, "bright");
        let group = DeviceGroup::from_handles([DeviceHandle::new(a.clone())]);

        let updates = refresh_status(&group).await;

        assert!(matches!(updates[0].result, Err(Error::Value(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn status_poll_delivers_updates_until_cancelled() {
        let a = FakeBulb::rgb("a", "desk", 0, 10);
        let group = group_of(&[&a]).await;
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let token = CancellationToken::new();

        let handle = spawn_status_poll(group, Duration::from_secs(7), token.clone(), move |u| {
            sink.lock().push(u.hostname);
        });

        tokio::time::sleep(Duration::from_secs(8)).await;
        assert_eq!(seen.lock().len(), 2);

        token.cancel();
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(seen.lock().len(), 2);
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_finishing_after_cancel_is_discarded() {
        let a = FakeBulb::rgb("a", "desk", 0, 10);
        a.set_fetch_delay(Duration::from_secs(5));
        let group = group_of(&[&a]).await;
        let seen = Arc::new(parking_lot::Mutex::new(0_usize));
        let sink = Arc::clone(&seen);

        let handle = spawn_status_poll(
            group,
            Duration::from_secs(7),
            CancellationToken::new(),
            move |_| *sink.lock() += 1,
        );

        tokio::time::sleep(Duration::from_secs(1)).await;
        handle.shutdown().await;

        assert_eq!(*seen.lock(), 0);
    }
}
