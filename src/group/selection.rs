// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The checked subset of a group.

use std::collections::HashSet;

/// Devices currently checked for bulk commands, keyed by hostname.
///
/// A selection is transient. It is keyed by hostname rather than by list
/// position, so reordering or refreshing the displayed rows never shifts
/// which bulbs a command reaches.
///
/// # Examples
///
/// ```
/// use yeegroup_lib::group::Selection;
///
/// let mut selection = Selection::all(["a", "b", "c"]);
/// selection.uncheck("b");
///
/// assert!(selection.is_checked("a"));
/// assert!(!selection.is_checked("b"));
/// assert_eq!(selection.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    checked: HashSet<String>,
}

impl Selection {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a selection with every given hostname checked.
    pub fn all<I, S>(hostnames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            checked: hostnames.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds a selection from per-row checked flags.
    ///
    /// `hostnames[i]` is checked when `flags[i]` is `true`. Rows without a
    /// flag are unchecked.
    #[must_use]
    pub fn from_flags<S: AsRef<str>>(hostnames: &[S], flags: &[bool]) -> Self {
        Self {
            checked: hostnames
                .iter()
                .zip(flags)
                .filter(|(_, checked)| **checked)
                .map(|(hostname, _)| hostname.as_ref().to_string())
                .collect(),
        }
    }

    /// Checks a device.
    pub fn check(&mut self, hostname: impl Into<String>) {
        self.checked.insert(hostname.into());
    }

    /// Unchecks a device.
    pub fn uncheck(&mut self, hostname: &str) {
        self.checked.remove(hostname);
    }

    /// Sets the checked state of a device.
    pub fn set(&mut self, hostname: impl Into<String>, checked: bool) {
        let hostname = hostname.into();
        if checked {
            self.checked.insert(hostname);
        } else {
            self.checked.remove(&hostname);
        }
    }

    /// Returns `true` if the device is checked.
    #[must_use]
    pub fn is_checked(&self, hostname: &str) -> bool {
        self.checked.contains(hostname)
    }

    /// Number of checked devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checked.len()
    }

    /// Returns `true` if nothing is checked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checked.is_empty()
    }
}
