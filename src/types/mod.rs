// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for bulb control.
//!
//! Each type ensures values are within their valid ranges at construction
//! time and knows how to parse the raw property string a bulb reports.
//!
//! # Types
//!
//! - [`PowerState`] - On/Off
//! - [`ColorMode`] - RGB or color temperature rendering
//! - [`RgbColor`] - 8-bit R/G/B with packed `0xRRGGBB` decoding
//! - [`Brightness`] - Brightness level (0-100%)
//! - [`ColorTemperature`] - White temperature in Kelvin (1700-6500)

mod brightness;
mod color_mode;
mod color_temperature;
mod power;
mod rgb_color;

pub use brightness::Brightness;
pub use color_mode::ColorMode;
pub use color_temperature::ColorTemperature;
pub use power::PowerState;
pub use rgb_color::RgbColor;
