// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Group session configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::event::DEFAULT_CHANNEL_CAPACITY;
use crate::poll::DEFAULT_POLL_INTERVAL;
use crate::types::ColorTemperature;

/// Settings for a [`GroupSession`](crate::session::GroupSession).
///
/// Every field has a default, so a partial document deserializes. The poll
/// interval is written in whole seconds.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use yeegroup_lib::config::SessionConfig;
/// use yeegroup_lib::types::ColorTemperature;
///
/// let config = SessionConfig::default()
///     .with_poll_interval(Duration::from_secs(3))
///     .with_white_temperature(ColorTemperature::clamped(5000))
///     .with_connect_on_open(false);
///
/// assert_eq!(config.poll_interval, Duration::from_secs(3));
/// assert_eq!(config.event_capacity, 256);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Time between two status polls.
    #[serde(rename = "poll_interval_secs", with = "duration_secs")]
    pub poll_interval: Duration,
    /// Temperature used by the "white" shortcut.
    pub white_temperature: ColorTemperature,
    /// Connect every device when the session opens.
    pub connect_on_open: bool,
    /// Events buffered per subscriber.
    pub event_capacity: usize,
}

impl SessionConfig {
    /// Sets the time between two status polls.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the temperature used by the "white" shortcut.
    #[must_use]
    pub fn with_white_temperature(mut self, temperature: ColorTemperature) -> Self {
        self.white_temperature = temperature;
        self
    }

    /// Sets whether devices are connected when the session opens.
    ///
    /// When disabled, the first poll or command connects them instead.
    #[must_use]
    pub fn with_connect_on_open(mut self, connect: bool) -> Self {
        self.connect_on_open = connect;
        self
    }

    /// Sets the number of events buffered per subscriber.
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            white_temperature: ColorTemperature::NEUTRAL,
            connect_on_open: true,
            event_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(
        value: &Duration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(7));
        assert_eq!(config.white_temperature.kelvin(), 4000);
        assert!(config.connect_on_open);
        assert_eq!(config.event_capacity, 256);
    }

    #[test]
    fn partial_document_uses_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"poll_interval_secs": 15, "connect_on_open": false}"#).unwrap();

        assert_eq!(config.poll_interval, Duration::from_secs(15));
        assert!(!config.connect_on_open);
        assert_eq!(config.white_temperature, ColorTemperature::NEUTRAL);
    }

    #[test]
    fn rejects_invalid_white_temperature() {
        let result = serde_json::from_str::<SessionConfig>(r#"{"white_temperature": 100}"#);
        assert!(result.is_err());
    }

    #[test]
    fn serializes_interval_as_seconds() {
        let json = serde_json::to_value(SessionConfig::default()).unwrap();
        assert_eq!(json["poll_interval_secs"], 7);
        assert_eq!(json["white_temperature"], 4000);
    }
}
