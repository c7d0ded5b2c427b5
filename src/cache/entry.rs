//! Cache Entry Module
//!
//! Defines the snapshot of a cached response stored by every backend.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// A stored response: status, body, headers and creation time.
///
/// `created_at_ms` is stamped once by the caller when the response is stored
/// and never changes afterwards; reusing an entry does not refresh it.
/// Header names are matched case-sensitively, so normalize them first
/// (see [`crate::cache::HeaderUtil`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Response status code
    pub status: u16,
    /// Response body
    pub body: String,
    /// Response headers
    pub headers: HashMap<String, String>,
    /// Creation timestamp (Unix milliseconds)
    pub created_at_ms: i64,
}

impl Default for CacheEntry {
    fn default() -> Self {
        Self {
            status: 200,
            body: String::new(),
            headers: HashMap::new(),
            created_at_ms: 0,
        }
    }
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry without headers.
    ///
    /// # Arguments
    /// * `status` - Response status code
    /// * `body` - Response body
    /// * `created_at_ms` - Time the response was received
    pub fn new(status: u16, body: impl Into<String>, created_at_ms: i64) -> Self {
        Self {
            status,
            body: body.into(),
            headers: HashMap::new(),
            created_at_ms,
        }
    }

    /// Adds a header, builder style.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    // == Age ==
    /// Age of the entry at `now_ms`.
    ///
    /// A negative result means the caller's clock went backwards; it is not
    /// corrected here. Saturates instead of overflowing on extreme timestamps.
    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(self.created_at_ms)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
