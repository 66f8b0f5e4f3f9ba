// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared handle to one device client.

use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{ConfigurationError, Error, Result};
use crate::types::{Brightness, ColorTemperature, PowerState, RgbColor};

use super::{DeviceClient, Properties, Property};

/// Cheaply cloneable handle to a [`DeviceClient`].
///
/// Groups, presets and the poll task all hold clones of the same handle.
/// Every call locks the client for its whole duration, so commands and
/// queries to one bulb are serialized over its single connection while
/// calls to different bulbs proceed concurrently.
pub struct DeviceHandle<C> {
    inner: Arc<HandleInner<C>>,
}

struct HandleInner<C> {
    hostname: String,
    client: Mutex<C>,
}

impl<C: DeviceClient> DeviceHandle<C> {
    /// Wraps a client. The hostname is captured once and never changes.
    pub fn new(client: C) -> Self {
        let hostname = client.hostname().to_string();
        Self {
            inner: Arc::new(HandleInner {
                hostname,
                client: Mutex::new(client),
            }),
        }
    }

    /// Returns the hostname of the device.
    #[must_use]
    pub fn hostname(&self) -> &str {
        &self.inner.hostname
    }

    /// Returns `true` if both handles point at the same client.
    #[must_use]
    pub fn same_client(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns `true` while the client reports an open connection.
    ///
    /// Waits for any call in progress on this device.
    pub async fn is_connected(&self) -> bool {
        self.inner.client.lock().await.is_connected()
    }

    /// Opens the connection.
    ///
    /// # Errors
    ///
    /// Returns the client's connection error.
    pub async fn connect(&self) -> Result<()> {
        tracing::debug!(hostname = %self.hostname(), "Connecting");
        self.inner.client.lock().await.connect().await
    }

    /// Connects only if the client is not connected.
    ///
    /// The check and the connect happen under one lock, so two concurrent
    /// callers never both connect. Returns `true` if a connect was issued.
    ///
    /// # Errors
    ///
    /// Returns the client's connection error.
    pub async fn connect_if_needed(&self) -> Result<bool> {
        let mut client = self.inner.client.lock().await;
        if client.is_connected() {
            return Ok(false);
        }
        tracing::debug!(hostname = %self.hostname(), "Reconnecting");
        client.connect().await?;
        Ok(true)
    }

    /// Closes the connection.
    ///
    /// # Errors
    ///
    /// Returns the client's error.
    pub async fn disconnect(&self) -> Result<()> {
        tracing::debug!(hostname = %self.hostname(), "Disconnecting");
        self.inner.client.lock().await.disconnect().await
    }

    /// Reads every property of interest.
    ///
    /// # Errors
    ///
    /// Returns the client's property fetch error.
    pub async fn properties(&self) -> Result<Properties> {
        self.inner.client.lock().await.get_all_properties().await
    }

    /// Reads a single property.
    ///
    /// # Errors
    ///
    /// Returns the client's property fetch error, or
    /// [`Error::PropertyFetch`] if the bulb does not report the property.
    pub async fn property(&self, property: Property) -> Result<String> {
        self.inner
            .client
            .lock()
            .await
            .get_property(property)
            .await?
            .ok_or_else(|| {
                Error::property_fetch(self.hostname(), format!("{property} not reported"))
            })
    }

    /// Returns the name stored on the bulb.
    ///
    /// # Errors
    ///
    /// Returns the client's property fetch error.
    pub async fn describe(&self) -> Result<String> {
        self.property(Property::Name).await
    }

    /// Switches the bulb on or off.
    ///
    /// # Errors
    ///
    /// Returns the client's command error.
    pub async fn set_power(&self, power: PowerState) -> Result<()> {
        tracing::debug!(hostname = %self.hostname(), %power, "Setting power");
        self.inner.client.lock().await.set_power(power).await
    }

    /// Sets the RGB color.
    ///
    /// # Errors
    ///
    /// Returns the client's command error.
    pub async fn set_rgb(&self, color: RgbColor) -> Result<()> {
        tracing::debug!(hostname = %self.hostname(), %color, "Setting color");
        self.inner.client.lock().await.set_rgb(color).await
    }

    /// Sets the brightness.
    ///
    /// # Errors
    ///
    /// Returns the client's command error.
    pub async fn set_brightness(&self, brightness: Brightness) -> Result<()> {
        tracing::debug!(hostname = %self.hostname(), %brightness, "Setting brightness");
        self.inner.client.lock().await.set_brightness(brightness).await
    }

    /// Sets the white temperature.
    ///
    /// # Errors
    ///
    /// Returns the client's command error.
    pub async fn set_color_temperature(&self, temperature: ColorTemperature) -> Result<()> {
        tracing::debug!(hostname = %self.hostname(), %temperature, "Setting temperature");
        self.inner
            .client
            .lock()
            .await
            .set_color_temperature(temperature)
            .await
    }

    /// Stores a new name on the bulb.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::EmptyDeviceName`] for an empty name
    /// without contacting the bulb, otherwise the client's command error.
    pub async fn rename(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(ConfigurationError::EmptyDeviceName.into());
        }
        tracing::debug!(hostname = %self.hostname(), name, "Renaming");
        self.inner.client.lock().await.set_name(name).await
    }
}

impl<C> Clone for DeviceHandle<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> fmt::Debug for DeviceHandle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("hostname", &self.inner.hostname)
            .finish_non_exhaustive()
    }
}
