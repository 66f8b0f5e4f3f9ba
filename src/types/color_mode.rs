// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Color rendering mode reported by a bulb.

/// The mode the bulb renders its light from.
///
/// The `color_mode` property is `"1"` in RGB mode. Every other value
/// (`"2"` for color temperature, `"3"` for HSV on some models) is treated
/// as temperature mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorMode {
    /// Light is rendered from the R/G/B channels.
    Rgb,
    /// Light is rendered from a Kelvin white temperature.
    Temperature,
}

impl ColorMode {
    /// Interprets the `color_mode` property.
    #[must_use]
    pub fn from_property(value: &str) -> Self {
        if value.trim() == "1" {
            Self::Rgb
        } else {
            Self::Temperature
        }
    }

    /// Returns `true` in RGB mode.
    #[must_use]
    pub const fn is_rgb(&self) -> bool {
        matches!(self, Self::Rgb)
    }
}
