// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-device results of a bulk operation.

use crate::error::Error;

/// Result of one bulk operation for one device.
#[derive(Debug)]
pub struct DeviceOutcome {
    /// Hostname of the device.
    pub hostname: String,
    /// What happened on that device.
    pub result: Result<(), Error>,
}

/// Per-hostname results of a bulk operation.
///
/// Bulk operations never stop at the first failure; the report lists every
/// device that was addressed, in group order.
#[derive(Debug)]
pub struct BulkReport {
    operation: &'static str,
    outcomes: Vec<DeviceOutcome>,
}

impl BulkReport {
    pub(crate) fn new(operation: &'static str, outcomes: Vec<DeviceOutcome>) -> Self {
        Self {
            operation,
            outcomes,
        }
    }

    /// Name of the operation, e.g. `"set_power"`.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Number of devices addressed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns `true` if no device was addressed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Returns `true` if every addressed device succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    /// Hostnames of the devices that succeeded.
    pub fn succeeded(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|o| o.result.is_ok())
            .map(|o| o.hostname.as_str())
    }

    /// Hostnames and errors of the devices that failed.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &Error)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.hostname.as_str(), e)))
    }

    /// Number of devices that failed.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// Returns the outcome for a hostname.
    #[must_use]
    pub fn outcome(&self, hostname: &str) -> Option<&DeviceOutcome> {
        self.outcomes.iter().find(|o| o.hostname == hostname)
    }

    /// Consumes the report, returning the outcomes.
    #[must_use]
    pub fn into_outcomes(self) -> Vec<DeviceOutcome> {
        self.outcomes
    }
}
