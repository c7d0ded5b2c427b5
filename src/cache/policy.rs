//! Cache Policy Module
//!
//! Freshness and staleness rules applied to an entry's age.

use serde::{Deserialize, Serialize};

/// Default freshness window (1 minute).
pub const DEFAULT_TTL_MS: i64 = 60_000;
/// Default stale-if-error window (5 minutes).
pub const DEFAULT_STALE_IF_ERROR_MS: i64 = 5 * 60_000;
/// Default stale-if-offline window (10 minutes).
pub const DEFAULT_STALE_IF_OFFLINE_MS: i64 = 10 * 60_000;

// == Cache Policy ==
/// Decides whether an entry of a given age may be served.
///
/// The stale windows are expected to be at least `ttl_ms`; a smaller window
/// simply never lets a stale entry through. This is not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachePolicy {
    /// Entries at most this old are fresh
    pub ttl_ms: i64,
    /// Maximum age served after a failed network attempt
    pub stale_if_error_ms: i64,
    /// Maximum age served while offline
    pub stale_if_offline_ms: i64,
    /// Whether stale entries may be served on network error
    pub allow_stale_if_error: bool,
    /// Whether stale entries may be served while offline
    pub allow_stale_if_offline: bool,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            ttl_ms: DEFAULT_TTL_MS,
            stale_if_error_ms: DEFAULT_STALE_IF_ERROR_MS,
            stale_if_offline_ms: DEFAULT_STALE_IF_OFFLINE_MS,
            allow_stale_if_error: true,
            allow_stale_if_offline: true,
        }
    }
}

impl CachePolicy {
    /// True if the entry is within the TTL window.
    pub fn is_fresh(&self, age_ms: i64) -> bool {
        age_ms <= self.ttl_ms
    }

    /// True if a stale entry may be served after a network error.
    pub fn allow_stale_error(&self, age_ms: i64) -> bool {
        self.allow_stale_if_error && age_ms <= self.stale_if_error_ms
    }

    /// True if a stale entry may be served while offline.
    pub fn allow_stale_offline(&self, age_ms: i64) -> bool {
        self.allow_stale_if_offline && age_ms <= self.stale_if_offline_ms
    }

    // == Retention ==
    /// Widest window during which an entry can still be served under some
    /// context. Disabled allowances do not count.
    pub fn retention_window_ms(&self) -> i64 {
        let mut window = self.ttl_ms;
        if self.allow_stale_if_error {
            window = window.max(self.stale_if_error_ms);
        }
        if self.allow_stale_if_offline {
            window = window.max(self.stale_if_offline_ms);
        }
        window
    }

    /// True if no context could make an entry of this age usable again.
    pub fn is_prunable(&self, age_ms: i64) -> bool {
        !self.is_fresh(age_ms)
            && !self.allow_stale_error(age_ms)
            && !self.allow_stale_offline(age_ms)
    }
}
