// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device client capability.
//!
//! The wire protocol of a bulb lives outside this crate. A transport
//! implements [`DeviceClient`] and the rest of the library drives it through
//! a [`DeviceHandle`], which serializes every call to one device.
//!
//! # Implementing a client
//!
//! ```
//! use yeegroup_lib::client::{DeviceClient, Properties, Property};
//! use yeegroup_lib::types::{Brightness, ColorTemperature, PowerState, RgbColor};
//! use yeegroup_lib::Result;
//!
//! struct LoopbackBulb {
//!     hostname: String,
//!     connected: bool,
//!     properties: Properties,
//! }
//!
//! impl DeviceClient for LoopbackBulb {
//!     fn hostname(&self) -> &str {
//!         &self.hostname
//!     }
//!
//!     fn is_connected(&self) -> bool {
//!         self.connected
//!     }
//!
//!     async fn connect(&mut self) -> Result<()> {
//!         self.connected = true;
//!         Ok(())
//!     }
//!
//!     async fn disconnect(&mut self) -> Result<()> {
//!         self.connected = false;
//!         Ok(())
//!     }
//!
//!     async fn get_property(&mut self, property: Property) -> Result<Option<String>> {
//!         Ok(self.properties.get(property).map(str::to_string))
//!     }
//!
//!     async fn get_all_properties(&mut self) -> Result<Properties> {
//!         Ok(self.properties.clone())
//!     }
//!
//!     async fn set_power(&mut self, power: PowerState) -> Result<()> {
//!         self.properties.insert(Property::Power, power.as_str());
//!         Ok(())
//!     }
//!
//!     async fn set_rgb(&mut self, color: RgbColor) -> Result<()> {
//!         self.properties.insert(Property::Rgb, color.to_packed().to_string());
//!         self.properties.insert(Property::ColorMode, "1");
//!         Ok(())
//!     }
//!
//!     async fn set_brightness(&mut self, brightness: Brightness) -> Result<()> {
//!         self.properties.insert(Property::Bright, brightness.value().to_string());
//!         Ok(())
//!     }
//!
//!     async fn set_color_temperature(&mut self, ct: ColorTemperature) -> Result<()> {
//!         self.properties.insert(Property::Ct, ct.kelvin().to_string());
//!         self.properties.insert(Property::ColorMode, "2");
//!         Ok(())
//!     }
//!
//!     async fn set_name(&mut self, name: &str) -> Result<()> {
//!         self.properties.insert(Property::Name, name);
//!         Ok(())
//!     }
//! }
//! ```

#[cfg(test)]
pub(crate) mod fake;
mod handle;
mod properties;

pub use handle::DeviceHandle;
pub use properties::{Properties, Property};

use std::future::Future;

use crate::error::Result;
use crate::types::{Brightness, ColorTemperature, PowerState, RgbColor};

/// One physical bulb, reachable over the network.
///
/// All I/O methods are suspension points and may fail with network
/// semantics (timeouts, refused connections). Implementations should
/// report failures through [`Error::Connection`](crate::Error::Connection),
/// [`Error::PropertyFetch`](crate::Error::PropertyFetch) or
/// [`Error::Command`](crate::Error::Command) carrying their hostname.
///
/// Methods take `&mut self`: a client is never driven by two calls at once.
pub trait DeviceClient: Send + 'static {
    /// Hostname (or IP address) identifying the bulb.
    fn hostname(&self) -> &str;

    /// Returns `true` while a connection is open.
    fn is_connected(&self) -> bool;

    /// Opens the connection.
    fn connect(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Closes the connection.
    fn disconnect(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Reads a single property. `None` if the bulb does not report it.
    fn get_property(
        &mut self,
        property: Property,
    ) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Reads every property of interest in one request.
    fn get_all_properties(&mut self) -> impl Future<Output = Result<Properties>> + Send;

    /// Switches the bulb on or off.
    fn set_power(&mut self, power: PowerState) -> impl Future<Output = Result<()>> + Send;

    /// Sets the RGB color (switches the bulb to RGB mode).
    fn set_rgb(&mut self, color: RgbColor) -> impl Future<Output = Result<()>> + Send;

    /// Sets the brightness.
    fn set_brightness(&mut self, brightness: Brightness)
    -> impl Future<Output = Result<()>> + Send;

    /// Sets the white temperature (switches the bulb to temperature mode).
    fn set_color_temperature(
        &mut self,
        temperature: ColorTemperature,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Stores a user-facing name on the bulb.
    fn set_name(&mut self, name: &str) -> impl Future<Output = Result<()>> + Send;
}
