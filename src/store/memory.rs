// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory [`Store`] implementation.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{ConfigurationError, Result};

use super::Store;

/// A [`Store`] that keeps its list in memory.
///
/// Clones share the same list, so a test can keep one clone to inspect what
/// was saved.
///
/// # Examples
///
/// ```
/// use yeegroup_lib::store::{MemoryStore, Store};
///
/// let store = MemoryStore::with_items(vec!["a", "b", "c"]);
/// let rest = store.delete_at(1).unwrap();
/// assert_eq!(rest, vec!["a", "c"]);
/// assert_eq!(store.load().unwrap(), vec!["a", "c"]);
/// ```
#[derive(Debug)]
pub struct MemoryStore<T> {
    items: Arc<RwLock<Vec<T>>>,
}

impl<T> MemoryStore<T> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    /// Creates a store holding `items`.
    #[must_use]
    pub fn with_items(items: Vec<T>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }

    /// Number of stored items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<T: Clone + Send + Sync> Store<T> for MemoryStore<T> {
    fn load(&self) -> Result<Vec<T>> {
        Ok(self.items.read().clone())
    }

    fn save(&self, items: &[T]) -> Result<()> {
        *self.items.write() = items.to_vec();
        Ok(())
    }

    fn delete_at(&self, index: usize) -> Result<Vec<T>> {
        let mut items = self.items.write();
        if index >= items.len() {
            return Err(ConfigurationError::IndexOutOfRange {
                index,
                len: items.len(),
            }
            .into());
        }
        items.remove(index);
        Ok(items.clone())
    }
}
