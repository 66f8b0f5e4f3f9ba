// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Color temperature in Kelvin.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// White color temperature in Kelvin (1700-6500).
///
/// Lower values are warmer (more orange), higher values cooler (bluer).
///
/// # Examples
///
/// ```
/// use yeegroup_lib::types::ColorTemperature;
///
/// let ct = ColorTemperature::new(4000).unwrap();
/// assert_eq!(ct.kelvin(), 4000);
/// assert_eq!(ct.to_string(), "4000K");
///
/// assert!(ColorTemperature::new(9000).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u16", into = "u16")]
pub struct ColorTemperature(u16);

impl ColorTemperature {
    /// Warmest supported value.
    pub const MIN: u16 = 1700;

    /// Coolest supported value.
    pub const MAX: u16 = 6500;

    /// Neutral white (4000K), the "white" shortcut.
    pub const NEUTRAL: Self = Self(4000);

    /// Creates a new color temperature.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if `kelvin` is outside [1700, 6500].
    pub fn new(kelvin: u16) -> Result<Self, ValueError> {
        if !(Self::MIN..=Self::MAX).contains(&kelvin) {
            return Err(ValueError::OutOfRange {
                min: u32::from(Self::MIN),
                max: u32::from(Self::MAX),
                actual: u32::from(kelvin),
            });
        }
        Ok(Self(kelvin))
    }

    /// Creates a color temperature, clamping to the valid range.
    #[must_use]
    pub const fn clamped(kelvin: u16) -> Self {
        if kelvin < Self::MIN {
            Self(Self::MIN)
        } else if kelvin > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(kelvin)
        }
    }

    /// Returns the value in Kelvin.
    #[must_use]
    pub const fn kelvin(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for ColorTemperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}K", self.0)
    }
}

impl TryFrom<u16> for ColorTemperature {
    type Error = ValueError;

    fn try_from(kelvin: u16) -> Result<Self, Self::Error> {
        Self::new(kelvin)
    }
}

impl From<ColorTemperature> for u16 {
    fn from(value: ColorTemperature) -> Self {
        value.0
    }
}

/// Parses the `ct` property.
///
/// Only read while a bulb is in temperature mode, so a value outside the
/// supported range is rejected instead of being reported as something the
/// bulb did not say.
impl FromStr for ColorTemperature {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kelvin: u16 = s.trim().parse().map_err(|_| ValueError::InvalidProperty {
            property: "ct",
            value: s.to_string(),
        })?;
        Self::new(kelvin)
    }
}
