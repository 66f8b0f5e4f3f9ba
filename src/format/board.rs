// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Display rows keyed by hostname.

use chrono::{DateTime, Utc};

use crate::error::Error;

use super::{DeviceStatus, StatusLine};

/// Last known state of a displayed device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
    /// Never successfully polled.
    Unknown,
    /// The last poll succeeded.
    Reachable(DeviceStatus),
    /// The last poll failed. The row keeps its previous text.
    Unreachable,
}

/// One displayed device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRow {
    /// Hostname identifying the row.
    pub hostname: String,
    /// Text to display.
    pub text: String,
    /// State behind the text.
    pub state: RowState,
    /// When the text was last replaced by a successful poll.
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl StatusRow {
    fn new(hostname: String) -> Self {
        Self {
            text: hostname.clone(),
            hostname,
            state: RowState::Unknown,
            refreshed_at: None,
        }
    }
}

/// Display rows for a group, one per hostname, in group order.
///
/// Updates are addressed by hostname and the board resolves the row
/// position itself, so a poll result can never land on the wrong row when
/// the member order changes between polls. A failed poll marks the row
/// unreachable but never blanks or replaces its text.
#[derive(Debug, Clone, Default)]
pub struct StatusBoard {
    rows: Vec<StatusRow>,
}

impl StatusBoard {
    /// Creates a board with one `Unknown` row per hostname.
    ///
    /// Duplicate hostnames collapse into one row.
    pub fn new<I, S>(hostnames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut board = Self::default();
        board.sync_members(hostnames);
        board
    }

    /// Aligns the rows with the current group members.
    ///
    /// Rows for known hostnames keep their text and state, new hostnames get
    /// an `Unknown` row, rows for departed hostnames are dropped, and the
    /// result follows the order given.
    pub fn sync_members<I, S>(&mut self, hostnames: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut previous = std::mem::take(&mut self.rows);
        for hostname in hostnames {
            let hostname = hostname.into();
            if self.rows.iter().any(|r| r.hostname == hostname) {
                continue;
            }
            let row = match previous.iter().position(|r| r.hostname == hostname) {
                Some(index) => previous.swap_remove(index),
                None => StatusRow::new(hostname),
            };
            self.rows.push(row);
        }
    }

    /// Records a poll result for a hostname.
    ///
    /// Returns the updated row, or `None` if the hostname has no row.
    pub fn apply(
        &mut self,
        hostname: &str,
        result: &Result<StatusLine, Error>,
    ) -> Option<&StatusRow> {
        let row = self.rows.iter_mut().find(|r| r.hostname == hostname)?;
        match result {
            Ok(line) => {
                row.text = line.to_string();
                row.state = RowState::Reachable(line.status);
                row.refreshed_at = Some(Utc::now());
            }
            Err(_) => {
                row.state = RowState::Unreachable;
            }
        }
        Some(row)
    }

    /// Returns the row for a hostname.
    #[must_use]
    pub fn row(&self, hostname: &str) -> Option<&StatusRow> {
        self.rows.iter().find(|r| r.hostname == hostname)
    }

    /// Returns the displayed text for a hostname.
    #[must_use]
    pub fn text(&self, hostname: &str) -> Option<&str> {
        self.row(hostname).map(|r| r.text.as_str())
    }

    /// Returns the display position of a hostname.
    #[must_use]
    pub fn position(&self, hostname: &str) -> Option<usize> {
        self.rows.iter().position(|r| r.hostname == hostname)
    }

    /// All rows in display order.
    #[must_use]
    pub fn rows(&self) -> &[StatusRow] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
