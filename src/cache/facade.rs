//! Cache Facade Module
//!
//! Applies a [`CachePolicy`] to entries held by a shared [`CacheStore`].

use std::sync::Arc;

use tracing::debug;

use crate::cache::stats::StatsRecorder;
use crate::cache::{CacheContext, CacheEntry, CachePolicy, CacheStats, CacheStore};
use crate::error::Result;

// == Cache ==
/// Policy-driven cache over a shared store.
///
/// `Cache` holds no lock of its own; it is as thread-safe as its store.
pub struct Cache {
    policy: CachePolicy,
    store: Arc<dyn CacheStore>,
    stats: StatsRecorder,
}

impl Cache {
    // == Constructor ==
    pub fn new(policy: CachePolicy, store: Arc<dyn CacheStore>) -> Self {
        Self {
            policy,
            store,
            stats: StatsRecorder::default(),
        }
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    // == Get ==
    /// Returns the entry under `key` if the policy allows serving it now.
    ///
    /// An entry is usable when it is fresh, or when it is within the
    /// stale-if-error window and `ctx.network_error` is set, or within the
    /// stale-if-offline window and `ctx.offline` is set. The entry is returned
    /// unchanged; its timestamp is not refreshed.
    ///
    /// `Ok(None)` covers both "never stored" and "stored but unusable".
    pub fn get(&self, key: &str, now_ms: i64, ctx: CacheContext) -> Result<Option<CacheEntry>> {
        let Some(entry) = self.store.get(key)? else {
            self.stats.record_miss();
            return Ok(None);
        };

        let age = entry.age_ms(now_ms);

        if self.policy.is_fresh(age) {
            self.stats.record_hit();
            return Ok(Some(entry));
        }

        let stale_ok = (ctx.network_error && self.policy.allow_stale_error(age))
            || (ctx.offline && self.policy.allow_stale_offline(age));

        if stale_ok {
            debug!(
                key,
                age_ms = age,
                offline = ctx.offline,
                network_error = ctx.network_error,
                "Serving stale entry"
            );
            self.stats.record_stale_hit();
            Ok(Some(entry))
        } else {
            self.stats.record_miss();
            Ok(None)
        }
    }

    // == Put ==
    /// Stores `entry` under `key`, replacing any previous one.
    ///
    /// `entry.created_at_ms` must already be set by the caller.
    pub fn put(&self, key: &str, entry: CacheEntry) -> Result<()> {
        self.store.put(key, entry)
    }

    // == Prune ==
    /// Removes entries that no context could make usable any more.
    ///
    /// Returns the number of entries removed.
    pub fn prune(&self, now_ms: i64) -> Result<usize> {
        let policy = self.policy;
        let removed = self
            .store
            .erase_if(&|entry: &CacheEntry| policy.is_prunable(entry.age_ms(now_ms)))?;

        self.stats.record_pruned(removed);
        debug!(removed, now_ms, "Pruned cache");
        Ok(removed)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }
}
