// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Durable list storage.
//!
//! The [`Store`] trait is the persistence capability consumed by the preset
//! library and the device roster. Serialization and file layout are up to
//! the implementation; this crate ships [`MemoryStore`] for tests and for
//! applications that persist elsewhere.

mod memory;

pub use memory::MemoryStore;

use crate::error::Result;

/// An ordered, durable list of `T`.
///
/// Implementations must be safe to share between tasks. Calls are
/// synchronous; callers treat every call as the source of truth and
/// replace their in-memory copy with what the store returns.
pub trait Store<T>: Send + Sync {
    /// Loads the full list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`](crate::Error::Store) if the list cannot be
    /// read.
    fn load(&self) -> Result<Vec<T>>;

    /// Replaces the full list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`](crate::Error::Store) if the list cannot be
    /// written.
    fn save(&self, items: &[T]) -> Result<()>;

    /// Removes the item at `index` and returns the remaining list.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range or the list cannot be
    /// written.
    fn delete_at(&self, index: usize) -> Result<Vec<T>>;
}
