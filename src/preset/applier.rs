// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Applying presets to live devices and capturing them back.

use futures::future::join_all;

use crate::client::{DeviceClient, DeviceHandle};
use crate::error::{Error, Result};
use crate::group::{BulkReport, DeviceGroup, DeviceOutcome};

use super::{Bulb, Preset};

/// Applies `preset` to the matching members of `group`.
///
/// Each entry is matched to a member by hostname. Entries without a matching
/// member are skipped. Matched bulbs are updated concurrently; each one gets
/// power, color and brightness, then the temperature when the entry has one.
/// A failing command does not stop the remaining commands for that bulb.
///
/// The report has one outcome per matched entry, carrying the first error
/// seen for that bulb.
pub async fn apply<C: DeviceClient>(preset: &Preset, group: &DeviceGroup<C>) -> BulkReport {
    let members = group.members().await;

    let mut targets = Vec::with_capacity(preset.bulbs.len());
    for bulb in &preset.bulbs {
        match members.iter().find(|m| m.hostname() == bulb.hostname) {
            Some(handle) => targets.push((handle.clone(), bulb.clone())),
            None => {
                tracing::debug!(
                    hostname = %bulb.hostname,
                    preset = %preset.name,
                    "Skipping bulb not in group"
                );
            }
        }
    }

    let outcomes = join_all(targets.into_iter().map(|(handle, bulb)| async move {
        DeviceOutcome {
            result: apply_bulb(&handle, &bulb).await,
            hostname: bulb.hostname,
        }
    }))
    .await;

    let report = BulkReport::new("apply_preset", outcomes);
    for (hostname, error) in report.failures() {
        tracing::warn!(
            %hostname,
            preset = %preset.name,
            error = %error,
            "Preset not fully applied"
        );
    }
    tracing::debug!(
        preset = %preset.name,
        applied = report.len(),
        skipped = preset.bulbs.len() - report.len(),
        "Preset applied"
    );
    report
}

async fn apply_bulb<C: DeviceClient>(handle: &DeviceHandle<C>, bulb: &Bulb) -> Result<()> {
    let mut first_error: Option<Error> = None;
    let mut keep = |result: Result<()>| {
        if let Err(e) = result {
            first_error.get_or_insert(e);
        }
    };

    keep(handle.set_power(bulb.power_state()).await);
    keep(handle.set_rgb(bulb.color).await);
    keep(handle.set_brightness(bulb.brightness).await);
    if let Some(temperature) = bulb.temperature {
        keep(handle.set_color_temperature(temperature).await);
    }

    first_error.map_or(Ok(()), Err)
}

/// Captures the current state of every member of `group` into a preset.
///
/// Members are queried concurrently. A member whose properties cannot be
/// fetched or interpreted is left out of the preset and logged; the preset
/// still holds every other member, in group order.
pub async fn snapshot<C: DeviceClient>(name: impl Into<String>, group: &DeviceGroup<C>) -> Preset {
    let name = name.into();
    let members = group.members().await;
    let total = members.len();

    let captured = join_all(members.into_iter().map(|handle| async move {
        let result = match handle.properties().await {
            Ok(properties) => {
                Bulb::from_properties(handle.hostname(), &properties).map_err(Error::from)
            }
            Err(e) => Err(e),
        };
        (handle, result)
    }))
    .await;

    let mut bulbs = Vec::with_capacity(total);
    for (handle, result) in captured {
        match result {
            Ok(bulb) => bulbs.push(bulb),
            Err(e) => {
                tracing::warn!(
                    hostname = %handle.hostname(),
                    preset = %name,
                    error = %e,
                    "Bulb left out of snapshot"
                );
            }
        }
    }

    tracing::debug!(preset = %name, captured = bulbs.len(), total, "Snapshot taken");
    Preset::new(name, bulbs)
}
