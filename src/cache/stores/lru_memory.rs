//! Bounded in-memory store with least-recently-used eviction.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use crate::cache::lru::{LruTracker, Slot};
use crate::cache::store::lock;
use crate::cache::{CacheEntry, CacheStore};
use crate::error::Result;

/// Default capacity of [`LruMemoryStore`].
pub const DEFAULT_MAX_ENTRIES: usize = 1024;

/// Configuration for [`LruMemoryStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LruMemoryStoreConfig {
    /// Maximum number of entries kept in memory
    pub max_entries: usize,
}

impl Default for LruMemoryStoreConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

#[derive(Debug)]
struct Node {
    entry: CacheEntry,
    slot: Slot,
}

/// Map and recency list, always holding the same key set.
#[derive(Debug, Default)]
struct Inner {
    map: HashMap<String, Node>,
    order: LruTracker,
    evictions: u64,
}

// == LRU Memory Store ==
/// In-memory store capped at `max_entries`, evicting the least recently
/// used entry first.
///
/// `put` and a `get` hit both count as a use. All operations are O(1)
/// apart from `erase_if` and `clear`.
#[derive(Debug)]
pub struct LruMemoryStore {
    config: LruMemoryStoreConfig,
    inner: Mutex<Inner>,
}

impl LruMemoryStore {
    pub fn new(config: LruMemoryStoreConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Shorthand for a store holding at most `max_entries`.
    pub fn with_capacity(max_entries: usize) -> Self {
        Self::new(LruMemoryStoreConfig { max_entries })
    }

    pub fn max_entries(&self) -> usize {
        self.config.max_entries
    }

    /// Entries evicted for capacity since creation.
    pub fn evictions(&self) -> Result<u64> {
        Ok(lock(&self.inner, "lru")?.evictions)
    }

    /// Keys from most to least recently used.
    pub fn keys_by_recency(&self) -> Result<Vec<String>> {
        let inner = lock(&self.inner, "lru")?;
        Ok(inner.order.keys().into_iter().map(str::to_string).collect())
    }
}

impl Default for LruMemoryStore {
    fn default() -> Self {
        Self::new(LruMemoryStoreConfig::default())
    }
}

impl CacheStore for LruMemoryStore {
    fn put(&self, key: &str, entry: CacheEntry) -> Result<()> {
        let mut guard = lock(&self.inner, "lru")?;
        let inner = &mut *guard;

        if let Some(node) = inner.map.get_mut(key) {
            node.entry = entry;
            inner.order.touch(node.slot);
            return Ok(());
        }

        let slot = inner.order.push_front(key.to_string());
        inner.map.insert(key.to_string(), Node { entry, slot });

        while inner.order.len() > self.config.max_entries {
            let Some(victim) = inner.order.evict_oldest() else {
                break;
            };
            inner.map.remove(&victim);
            inner.evictions += 1;
            debug!(key = %victim, "Evicted least recently used entry");
        }

        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        let mut guard = lock(&self.inner, "lru")?;
        let inner = &mut *guard;

        match inner.map.get(key) {
            Some(node) => {
                inner.order.touch(node.slot);
                Ok(Some(node.entry.clone()))
            }
            None => Ok(None),
        }
    }

    fn erase(&self, key: &str) -> Result<()> {
        let mut inner = lock(&self.inner, "lru")?;
        if let Some(node) = inner.map.remove(key) {
            inner.order.remove(node.slot);
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut inner = lock(&self.inner, "lru")?;
        inner.map.clear();
        inner.order.clear();
        Ok(())
    }

    fn erase_if(&self, pred: &dyn Fn(&CacheEntry) -> bool) -> Result<usize> {
        let mut guard = lock(&self.inner, "lru")?;
        let Inner { map, order, .. } = &mut *guard;

        let before = map.len();
        map.retain(|_, node| {
            if pred(&node.entry) {
                order.remove(node.slot);
                false
            } else {
                true
            }
        });
        Ok(before - map.len())
    }

    fn len(&self) -> Result<usize> {
        Ok(lock(&self.inner, "lru")?.map.len())
    }
}
