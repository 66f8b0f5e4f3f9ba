// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `YeeGroup` library.
//!
//! Device-level failures (connection, property fetch, command) always carry
//! the hostname of the device that failed so that bulk operations can report
//! them per device. Configuration errors are raised at the boundary, before
//! any device is contacted.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The device could not be reached or the connection timed out.
    #[error("connection to {hostname} failed: {message}")]
    Connection {
        /// Hostname of the device.
        hostname: String,
        /// Description of the failure.
        message: String,
    },

    /// Reading properties from the device failed.
    #[error("reading properties from {hostname} failed: {message}")]
    PropertyFetch {
        /// Hostname of the device.
        hostname: String,
        /// Description of the failure.
        message: String,
    },

    /// A set command (power, color, brightness, ...) failed.
    #[error("{command} on {hostname} failed: {message}")]
    Command {
        /// Hostname of the device.
        hostname: String,
        /// Name of the command that failed.
        command: &'static str,
        /// Description of the failure.
        message: String,
    },

    /// The device has no open connection.
    #[error("{hostname} is not connected")]
    NotConnected {
        /// Hostname of the device.
        hostname: String,
    },

    /// No device with this hostname is known.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// A request was rejected before reaching any device.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A value was outside its valid range or could not be parsed.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// The persistent store failed to load or save.
    #[error("store error: {0}")]
    Store(String),
}

impl Error {
    /// Returns the hostname of the device involved, if any.
    #[must_use]
    pub fn hostname(&self) -> Option<&str> {
        match self {
            Self::Connection { hostname, .. }
            | Self::PropertyFetch { hostname, .. }
            | Self::Command { hostname, .. }
            | Self::NotConnected { hostname } => Some(hostname),
            Self::DeviceNotFound(hostname) => Some(hostname),
            Self::Configuration(_) | Self::Value(_) | Self::Store(_) => None,
        }
    }

    /// Returns `true` for failures that a later reconnect pass may heal.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::NotConnected { .. })
    }

    /// Returns `true` if the request was rejected at the boundary.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Creates a connection error.
    pub fn connection(hostname: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connection {
            hostname: hostname.into(),
            message: message.into(),
        }
    }

    /// Creates a property fetch error.
    pub fn property_fetch(hostname: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PropertyFetch {
            hostname: hostname.into(),
            message: message.into(),
        }
    }

    /// Creates a command error.
    pub fn command(
        hostname: impl Into<String>,
        command: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::Command {
            hostname: hostname.into(),
            command,
            message: message.into(),
        }
    }
}

/// Requests rejected before reaching the devices.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A preset must have a non-empty name.
    #[error("preset name must not be empty")]
    EmptyPresetName,

    /// A device name must not be empty.
    #[error("device name must not be empty")]
    EmptyDeviceName,

    /// No preset is currently selected.
    #[error("no preset selected")]
    NoPresetSelected,

    /// The list index does not exist.
    #[error("index {index} is out of range ({len} entries)")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of entries currently stored.
        len: usize,
    },

    /// The preset was replaced or removed while a snapshot was being taken.
    #[error("preset {index} changed while it was being overwritten")]
    PresetChanged {
        /// The slot that was being overwritten.
        index: usize,
    },
}

/// Errors related to value validation and property parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u32,
        /// Maximum allowed value.
        max: u32,
        /// The actual value that was provided.
        actual: u32,
    },

    /// A property is missing from the device report.
    #[error("missing property: {0}")]
    MissingProperty(&'static str),

    /// A property value could not be parsed.
    #[error("invalid value {value:?} for property {property}")]
    InvalidProperty {
        /// The property name.
        property: &'static str,
        /// The raw value reported by the device.
        value: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
