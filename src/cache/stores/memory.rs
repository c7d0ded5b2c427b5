//! Unbounded in-memory store.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::cache::store::lock;
use crate::cache::{CacheEntry, CacheStore};
use crate::error::Result;

// == Memory Store ==
/// Mutex-guarded map with no eviction and no persistence.
///
/// Size is unbounded; pair it with [`crate::cache::Cache::prune`] or use
/// [`crate::cache::LruMemoryStore`] when memory must be capped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryStore {
    fn put(&self, key: &str, entry: CacheEntry) -> Result<()> {
        lock(&self.entries, "memory")?.insert(key.to_string(), entry);
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        Ok(lock(&self.entries, "memory")?.get(key).cloned())
    }

    fn erase(&self, key: &str) -> Result<()> {
        lock(&self.entries, "memory")?.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        lock(&self.entries, "memory")?.clear();
        Ok(())
    }

    fn erase_if(&self, pred: &dyn Fn(&CacheEntry) -> bool) -> Result<usize> {
        let mut entries = lock(&self.entries, "memory")?;
        let before = entries.len();
        entries.retain(|_, entry| !pred(entry));
        Ok(before - entries.len())
    }

    fn len(&self) -> Result<usize> {
        Ok(lock(&self.entries, "memory")?.len())
    }
}
