// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Group event types.

use crate::format::DeviceStatus;

/// Events emitted by a group session.
///
/// Device events carry the hostname so a view can address the right row
/// regardless of display order.
///
/// # Examples
///
/// ```
/// use yeegroup_lib::event::GroupEvent;
///
/// let event = GroupEvent::unreachable("10.0.0.7", "timed out");
/// assert_eq!(event.hostname(), Some("10.0.0.7"));
/// assert!(event.is_failure());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupEvent {
    /// A poll read the device and its displayed text was replaced.
    StatusUpdated {
        /// Hostname of the device.
        hostname: String,
        /// New display text.
        text: String,
        /// Interpreted state behind the text.
        status: DeviceStatus,
    },

    /// A poll could not read the device. Its previous text stays displayed.
    DeviceUnreachable {
        /// Hostname of the device.
        hostname: String,
        /// Why the read failed.
        error: String,
    },

    /// A command sent to the device failed.
    CommandFailed {
        /// Hostname of the device.
        hostname: String,
        /// Name of the bulk operation.
        operation: &'static str,
        /// Why the command failed.
        error: String,
    },

    /// The saved preset list was reloaded after a change.
    PresetsChanged {
        /// Number of presets now saved.
        count: usize,
    },

    /// A preset was applied to the group.
    PresetApplied {
        /// Name of the preset.
        name: String,
        /// Number of bulbs it was applied to.
        applied: usize,
    },

    /// The session was closed. No further events follow.
    SessionClosed,
}

impl GroupEvent {
    /// Returns the hostname associated with this event, if any.
    #[must_use]
    pub fn hostname(&self) -> Option<&str> {
        match self {
            Self::StatusUpdated { hostname, .. }
            | Self::DeviceUnreachable { hostname, .. }
            | Self::CommandFailed { hostname, .. } => Some(hostname),
            Self::PresetsChanged { .. } | Self::PresetApplied { .. } | Self::SessionClosed => None,
        }
    }

    /// Returns `true` for events reporting a device failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::DeviceUnreachable { .. } | Self::CommandFailed { .. }
        )
    }

    /// Returns `true` for events about the preset list or its use.
    #[must_use]
    pub fn is_preset(&self) -> bool {
        matches!(self, Self::PresetsChanged { .. } | Self::PresetApplied { .. })
    }

    /// Creates a status updated event.
    #[must_use]
    pub fn status_updated(
        hostname: impl Into<String>,
        text: impl Into<String>,
        status: DeviceStatus,
    ) -> Self {
        Self::StatusUpdated {
            hostname: hostname.into(),
            text: text.into(),
            status,
        }
    }

    /// Creates a device unreachable event.
    #[must_use]
    pub fn unreachable(hostname: impl Into<String>, error: impl Into<String>) -> Self {
        Self::DeviceUnreachable {
            hostname: hostname.into(),
            error: error.into(),
        }
    }

    /// Creates a command failed event.
    #[must_use]
    pub fn command_failed(
        hostname: impl Into<String>,
        operation: &'static str,
        error: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            hostname: hostname.into(),
            operation,
            error: error.into(),
        }
    }

    /// Creates a presets changed event.
    #[must_use]
    pub fn presets_changed(count: usize) -> Self {
        Self::PresetsChanged { count }
    }
}
