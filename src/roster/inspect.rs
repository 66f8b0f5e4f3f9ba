// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! One-off device access outside a group.

use crate::client::{DeviceClient, DeviceHandle};
use crate::error::{ConfigurationError, Result};

/// Connects to a bulb, reads its stored name and disconnects.
///
/// # Errors
///
/// Returns the connection or property fetch error.
pub async fn inspect_device<C: DeviceClient>(client: C) -> Result<String> {
    let handle = DeviceHandle::new(client);
    handle.connect().await?;
    let name = handle.describe().await;
    release(&handle).await;
    name
}

/// Connects to a bulb, stores a new name on it and disconnects.
///
/// # Errors
///
/// Returns [`ConfigurationError::EmptyDeviceName`] without connecting if
/// `name` is empty, otherwise the connection or command error.
pub async fn rename_device<C: DeviceClient>(client: C, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ConfigurationError::EmptyDeviceName.into());
    }

    let handle = DeviceHandle::new(client);
    handle.connect().await?;
    let renamed = handle.rename(name).await;
    release(&handle).await;
    if renamed.is_ok() {
        tracing::info!(hostname = %handle.hostname(), name, "Device renamed");
    }
    renamed
}

async fn release<C: DeviceClient>(handle: &DeviceHandle<C>) {
    if let Err(e) = handle.disconnect().await {
        tracing::debug!(
            hostname = %handle.hostname(),
            error = %e,
            "Disconnect after one-off access failed"
        );
    }
}
