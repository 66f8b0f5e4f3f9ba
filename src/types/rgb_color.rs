// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RGB color type with packed-integer decoding.
//!
//! Bulbs report their color as a single decimal integer in `0xRRGGBB`
//! layout. This module converts between that packed form and the three
//! 8-bit channels used by the set-color command.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// RGB color with 8-bit channels (0-255).
///
/// # Examples
///
/// ```
/// use yeegroup_lib::types::RgbColor;
///
/// let color = RgbColor::from_packed(0x10_20_30);
/// assert_eq!((color.red(), color.green(), color.blue()), (16, 32, 48));
/// assert_eq!(color.to_packed(), 0x10_20_30);
///
/// // Bulbs report the packed value as a decimal string
/// let white: RgbColor = "16777215".parse().unwrap();
/// assert_eq!(white, RgbColor::white());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RgbColor {
    #[serde(rename = "R")]
    red: u8,
    #[serde(rename = "G")]
    green: u8,
    #[serde(rename = "B")]
    blue: u8,
}

impl RgbColor {
    /// Creates a new RGB color.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Decodes a packed `0xRRGGBB` integer.
    ///
    /// Bits above the low 24 (alpha or sign) are ignored.
    #[must_use]
    pub const fn from_packed(packed: u32) -> Self {
        Self {
            red: ((packed >> 16) & 0xFF) as u8,
            green: ((packed >> 8) & 0xFF) as u8,
            blue: (packed & 0xFF) as u8,
        }
    }

    /// Encodes the color as a packed `0xRRGGBB` integer.
    #[must_use]
    pub const fn to_packed(&self) -> u32 {
        ((self.red as u32) << 16) | ((self.green as u32) << 8) | self.blue as u32
    }

    /// Returns the red component.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Returns the green component.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Returns the blue component.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Creates a white color.
    #[must_use]
    pub const fn white() -> Self {
        Self::new(255, 255, 255)
    }

    /// Creates a black color.
    #[must_use]
    pub const fn black() -> Self {
        Self::new(0, 0, 0)
    }
}

impl Default for RgbColor {
    fn default() -> Self {
        Self::white()
    }
}

/// Formats as `(r, g, b)`, the form used in status lines.
impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.red, self.green, self.blue)
    }
}

/// Parses the decimal packed form reported in the `rgb` property.
impl FromStr for RgbColor {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let packed: i64 = s.trim().parse().map_err(|_| ValueError::InvalidProperty {
            property: "rgb",
            value: s.to_string(),
        })?;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let masked = (packed & 0x00FF_FFFF) as u32;
        Ok(Self::from_packed(masked))
    }
}

impl From<(u8, u8, u8)> for RgbColor {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::new(red, green, blue)
    }
}

impl From<u32> for RgbColor {
    fn from(packed: u32) -> Self {
        Self::from_packed(packed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_standard_packing() {
        let color = RgbColor::from_packed(0x10_20_30);
        assert_eq!(color.red(), 16);
        assert_eq!(color.green(), 32);
        assert_eq!(color.blue(), 48);
    }

    #[test]
    fn decodes_extremes() {
        assert_eq!(RgbColor::from_packed(0xFF_FF_FF), RgbColor::new(255, 255, 255));
        assert_eq!(RgbColor::from_packed(0x00_00_00), RgbColor::new(0, 0, 0));
    }

    #[test]
    fn ignores_alpha_bits() {
        assert_eq!(RgbColor::from_packed(0xFF_FF_00_00), RgbColor::new(255, 0, 0));
    }

    #[test]
    fn parses_decimal_property() {
        let color: RgbColor = "16711680".parse().unwrap();
        assert_eq!(color, RgbColor::new(255, 0, 0));

        let color: RgbColor = " 1056816 ".parse().unwrap();
        assert_eq!(color, RgbColor::new(16, 32, 48));
    }

    #[test]
    fn parses_negative_argb_value() {
        // 0xFF102030 as a signed 32-bit integer
        let color: RgbColor = "-15720400".parse().unwrap();
        assert_eq!(color, RgbColor::new(16, 32, 48));
    }

    #[test]
    fn rejects_garbage() {
        assert!("red".parse::<RgbColor>().is_err());
        assert!("".parse::<RgbColor>().is_err());
    }

    #[test]
    fn packs_back() {
        assert_eq!(RgbColor::new(1, 2, 3).to_packed(), 0x01_02_03);
    }

    #[test]
    fn display_matches_status_format() {
        assert_eq!(RgbColor::new(255, 0, 0).to_string(), "(255, 0, 0)");
    }
}
