// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Preset data model.

use serde::{Deserialize, Serialize};

use crate::client::{Properties, Property};
use crate::error::ValueError;
use crate::types::{Brightness, ColorMode, ColorTemperature, PowerState, RgbColor};

/// Saved settings of one bulb.
///
/// `color` is always captured. `temperature` is captured only when the bulb
/// was in temperature mode, and its presence is what tells [`apply`] to
/// restore the temperature after the color.
///
/// [`apply`]: crate::preset::apply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Bulb {
    /// Hostname of the bulb.
    pub hostname: String,
    /// Whether the bulb was on.
    pub power: bool,
    /// Last RGB color.
    pub color: RgbColor,
    /// Brightness in percent.
    pub brightness: Brightness,
    /// White temperature, present only for bulbs in temperature mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<ColorTemperature>,
}

impl Bulb {
    /// Captures a bulb from its raw properties.
    ///
    /// # Errors
    ///
    /// Returns `ValueError` if `power`, `color_mode`, `rgb` or `bright` is
    /// missing or invalid, or if the bulb is in temperature mode and `ct` is.
    ///
    /// # Examples
    ///
    /// ```
    /// use yeegroup_lib::client::{Properties, Property};
    /// use yeegroup_lib::preset::Bulb;
    ///
    /// let props = Properties::new()
    ///     .with(Property::Power, "on")
    ///     .with(Property::ColorMode, "2")
    ///     .with(Property::Rgb, "16777215")
    ///     .with(Property::Bright, "40")
    ///     .with(Property::Ct, "2700");
    ///
    /// let bulb = Bulb::from_properties("10.0.0.7", &props).unwrap();
    /// assert!(bulb.power);
    /// assert_eq!(bulb.temperature.map(|t| t.kelvin()), Some(2700));
    /// ```
    pub fn from_properties(
        hostname: impl Into<String>,
        properties: &Properties,
    ) -> Result<Self, ValueError> {
        let power = PowerState::from_property(properties.require(Property::Power)?);
        let mode = ColorMode::from_property(properties.require(Property::ColorMode)?);
        let temperature = if mode.is_rgb() {
            None
        } else {
            Some(properties.parse(Property::Ct)?)
        };

        Ok(Self {
            hostname: hostname.into(),
            power: power.is_on(),
            color: properties.parse(Property::Rgb)?,
            brightness: properties.parse(Property::Bright)?,
            temperature,
        })
    }

    /// Returns the saved power state.
    #[must_use]
    pub fn power_state(&self) -> PowerState {
        PowerState::from(self.power)
    }
}

/// A named set of bulb settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Preset {
    /// User-assigned name. Not required to be unique.
    pub name: String,
    /// One entry per captured bulb.
    #[serde(default)]
    pub bulbs: Vec<Bulb>,
}

impl Preset {
    /// Creates a preset.
    pub fn new(name: impl Into<String>, bulbs: Vec<Bulb>) -> Self {
        Self {
            name: name.into(),
            bulbs,
        }
    }

    /// Returns the entry for a hostname.
    #[must_use]
    pub fn bulb(&self, hostname: &str) -> Option<&Bulb> {
        self.bulbs.iter().find(|b| b.hostname == hostname)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bulbs.len()
    }

    /// Returns `true` if the preset has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bulbs.is_empty()
    }
}
