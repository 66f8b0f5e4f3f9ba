// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Canonical device status and its display string.

use std::fmt;

use crate::client::{Properties, Property};
use crate::error::ValueError;
use crate::types::{Brightness, ColorMode, ColorTemperature, PowerState, RgbColor};

/// What a lit bulb is rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightSetting {
    /// RGB mode with the reported color.
    Rgb(RgbColor),
    /// Temperature mode with the reported white temperature.
    Temperature(ColorTemperature),
}

impl fmt::Display for LightSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb(color) => fmt::Display::fmt(color, f),
            Self::Temperature(ct) => fmt::Display::fmt(ct, f),
        }
    }
}

/// Canonical state of a reachable bulb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStatus {
    /// The bulb is off. Color and brightness are not reported.
    Off,
    /// The bulb is on.
    On {
        /// Current color or temperature.
        light: LightSetting,
        /// Current brightness.
        brightness: Brightness,
    },
}

impl DeviceStatus {
    /// Interprets raw bulb properties.
    ///
    /// When the bulb is off only `power` is read, so a bulb reporting stale
    /// or garbage color values while off still yields [`DeviceStatus::Off`].
    ///
    /// # Errors
    ///
    /// Returns `ValueError` if a property needed for the current power
    /// state and mode is missing or invalid.
    pub fn from_properties(properties: &Properties) -> Result<Self, ValueError> {
        let power = PowerState::from_property(properties.require(Property::Power)?);
        if !power.is_on() {
            return Ok(Self::Off);
        }

        let mode = ColorMode::from_property(properties.require(Property::ColorMode)?);
        let light = match mode {
            ColorMode::Rgb => LightSetting::Rgb(properties.parse(Property::Rgb)?),
            ColorMode::Temperature => LightSetting::Temperature(properties.parse(Property::Ct)?),
        };
        let brightness = properties.parse(Property::Bright)?;

        Ok(Self::On { light, brightness })
    }

    /// Returns the power state.
    #[must_use]
    pub fn power(&self) -> PowerState {
        match self {
            Self::Off => PowerState::Off,
            Self::On { .. } => PowerState::On,
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "OFF"),
            Self::On { light, brightness } => write!(f, "ON, {light}, {brightness}"),
        }
    }
}

/// One formatted status line: `<name> [<hostname>] - <status>`.
///
/// # Examples
///
/// ```
/// use yeegroup_lib::client::{Properties, Property};
/// use yeegroup_lib::format::StatusLine;
///
/// let props = Properties::new()
///     .with(Property::Name, "desk")
///     .with(Property::Power, "on")
///     .with(Property::ColorMode, "1")
///     .with(Property::Rgb, "16711680")
///     .with(Property::Bright, "50");
///
/// let line = StatusLine::from_properties("10.0.0.7", &props).unwrap();
/// assert_eq!(line.to_string(), "desk [10.0.0.7] - ON, (255, 0, 0), 50%");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// Name stored on the bulb (empty if unset).
    pub name: String,
    /// Hostname of the bulb.
    pub hostname: String,
    /// Interpreted state.
    pub status: DeviceStatus,
}

impl StatusLine {
    /// Builds a status line from raw properties.
    ///
    /// # Errors
    ///
    /// Returns `ValueError` if the properties cannot be interpreted.
    pub fn from_properties(
        hostname: impl Into<String>,
        properties: &Properties,
    ) -> Result<Self, ValueError> {
        Ok(Self {
            name: properties.get(Property::Name).unwrap_or_default().to_string(),
            hostname: hostname.into(),
            status: DeviceStatus::from_properties(properties)?,
        })
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] - {}", self.name, self.hostname, self.status)
    }
}

/// Formats raw properties into the canonical display string.
///
/// # Errors
///
/// Returns `ValueError` if the properties cannot be interpreted.
pub fn format_status(hostname: &str, properties: &Properties) -> Result<String, ValueError> {
    StatusLine::from_properties(hostname, properties).map(|line| line.to_string())
}
