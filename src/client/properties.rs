// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bulb property names and the raw property map.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Properties the library reads from a bulb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    /// User-assigned bulb name.
    Name,
    /// `"on"` or `"off"`.
    Power,
    /// `"1"` for RGB mode, anything else for temperature mode.
    ColorMode,
    /// Packed `0xRRGGBB` color as a decimal string.
    Rgb,
    /// Brightness 0-100.
    Bright,
    /// White temperature in Kelvin.
    Ct,
}

impl Property {
    /// Every property, in the order they are requested.
    pub const ALL: [Self; 6] = [
        Self::Name,
        Self::Power,
        Self::ColorMode,
        Self::Rgb,
        Self::Bright,
        Self::Ct,
    ];

    /// Returns the protocol name of the property.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Power => "power",
            Self::ColorMode => "color_mode",
            Self::Rgb => "rgb",
            Self::Bright => "bright",
            Self::Ct => "ct",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw property values as reported by a bulb.
///
/// # Examples
///
/// ```
/// use yeegroup_lib::client::{Properties, Property};
///
/// let props = Properties::new()
///     .with(Property::Power, "on")
///     .with(Property::Bright, "50");
///
/// assert_eq!(props.get(Property::Power), Some("on"));
/// assert_eq!(props.parse::<u8>(Property::Bright).unwrap(), 50);
/// assert!(props.require(Property::Rgb).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    values: HashMap<Property, String>,
}

impl Properties {
    /// Creates an empty property map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, builder style.
    #[must_use]
    pub fn with(mut self, property: Property, value: impl Into<String>) -> Self {
        self.insert(property, value);
        self
    }

    /// Sets a value, replacing any previous one.
    pub fn insert(&mut self, property: Property, value: impl Into<String>) {
        self.values.insert(property, value.into());
    }

    /// Returns the raw value of a property.
    #[must_use]
    pub fn get(&self, property: Property) -> Option<&str> {
        self.values.get(&property).map(String::as_str)
    }

    /// Returns the raw value of a property that must be present.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::MissingProperty` if the bulb did not report it.
    pub fn require(&self, property: Property) -> Result<&str, ValueError> {
        self.get(property)
            .ok_or(ValueError::MissingProperty(property.as_str()))
    }

    /// Parses a required property.
    ///
    /// # Errors
    ///
    /// Returns `ValueError` if the property is missing or cannot be parsed.
    pub fn parse<T>(&self, property: Property) -> Result<T, ValueError>
    where
        T: FromStr,
    {
        let raw = self.require(property)?;
        raw.trim().parse().map_err(|_| ValueError::InvalidProperty {
            property: property.as_str(),
            value: raw.to_string(),
        })
    }

    /// Number of properties present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no property is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(Property, String)> for Properties {
    fn from_iter<I: IntoIterator<Item = (Property, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
