//! Cache Store Module
//!
//! The storage contract shared by every backend.

use std::sync::{Mutex, MutexGuard};

use crate::cache::CacheEntry;
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Key to entry storage used by [`crate::cache::Cache`].
///
/// Implementations are internally synchronized so one store can be shared
/// behind an `Arc` across threads. A missing key is `Ok(None)`, never an
/// error; errors are reserved for storage faults.
pub trait CacheStore: Send + Sync {
    /// Inserts or overwrites the entry under `key`.
    fn put(&self, key: &str, entry: CacheEntry) -> Result<()>;

    /// Returns a copy of the entry under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<CacheEntry>>;

    /// Removes `key`. Removing an absent key is a no-op.
    fn erase(&self, key: &str) -> Result<()>;

    /// Removes every entry.
    fn clear(&self) -> Result<()>;

    /// Removes every entry matching `pred` under a single lock acquisition.
    ///
    /// Returns the number of entries removed.
    fn erase_if(&self, pred: &dyn Fn(&CacheEntry) -> bool) -> Result<usize>;

    /// Number of stored entries.
    fn len(&self) -> Result<usize>;

    /// True if the store holds no entries.
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// Acquires a store mutex, turning poisoning into a storage error.
pub(crate) fn lock<'a, T>(mutex: &'a Mutex<T>, store: &'static str) -> Result<MutexGuard<'a, T>> {
    mutex.lock().map_err(|_| CacheError::LockPoisoned(store))
}
