//! Header Utilities
//!
//! Header-name normalization used before keying or storing responses.

use std::collections::HashMap;

/// Helpers for case-normalizing HTTP header names.
pub struct HeaderUtil;

impl HeaderUtil {
    /// Lowercases ASCII letters.
    pub fn to_lower(s: &str) -> String {
        s.to_ascii_lowercase()
    }

    /// Lowercases every header name in place.
    ///
    /// When two names differ only by case, one of the values survives;
    /// which one depends on map iteration order.
    pub fn normalize_in_place(headers: &mut HashMap<String, String>) {
        if headers.keys().all(|k| !k.bytes().any(|b| b.is_ascii_uppercase())) {
            return;
        }

        let normalized = headers
            .drain()
            .map(|(name, value)| (Self::to_lower(&name), value))
            .collect();
        *headers = normalized;
    }
}
