//! Cache Key Module
//!
//! Builds the canonical lookup key for a request.

use std::collections::HashMap;

use crate::cache::headers::HeaderUtil;

// == Cache Key ==
/// Deterministic key builder for request-based caching.
///
/// The key has the form `METHOD path?sorted_query |h:name=value;name=value;`:
/// - the method is uppercased
/// - query pairs are sorted by key, then value
/// - selected header names are lowercased and their values trimmed
pub struct CacheKey;

impl CacheKey {
    /// Builds a cache key from request components.
    ///
    /// # Arguments
    /// * `method` - HTTP method, any case
    /// * `path` - Request path, used verbatim
    /// * `query` - Raw query string without the leading `?`
    /// * `headers` - Request headers
    /// * `include_headers` - Header names folded into the key, in this order
    ///
    /// Each included header is looked up under the given name first and then
    /// under its lowercased form. Headers missing under both are skipped.
    pub fn from_request<S: AsRef<str>>(
        method: &str,
        path: &str,
        query: &str,
        headers: &HashMap<String, String>,
        include_headers: &[S],
    ) -> String {
        let query = normalize_query(query);

        let mut key = String::with_capacity(64 + path.len() + query.len());
        key.push_str(&method.to_ascii_uppercase());
        key.push(' ');
        key.push_str(path);

        if !query.is_empty() {
            key.push('?');
            key.push_str(&query);
        }

        if !include_headers.is_empty() {
            key.push_str(" |h:");
            for name in include_headers {
                let name = name.as_ref();
                let lowered = HeaderUtil::to_lower(name);
                let value = headers.get(name).or_else(|| headers.get(&lowered));

                if let Some(value) = value {
                    key.push_str(&lowered);
                    key.push('=');
                    key.push_str(trim_space(value));
                    key.push(';');
                }
            }
        }

        key
    }
}

/// Sorts query pairs so parameter order does not matter.
///
/// Duplicate keys stay as separate pairs. A segment without `=` has an empty
/// value, and empty values are written back without `=`.
fn normalize_query(query: &str) -> String {
    if query.is_empty() {
        return String::new();
    }

    // A trailing '&' does not open another segment
    let body = query.strip_suffix('&').unwrap_or(query);

    let mut pairs: Vec<(&str, &str)> = body
        .split('&')
        .map(|part| part.split_once('=').unwrap_or((part, "")))
        .collect();
    pairs.sort_unstable();

    let mut out = String::with_capacity(query.len());
    for (idx, (k, v)) in pairs.iter().enumerate() {
        if idx > 0 {
            out.push('&');
        }
        out.push_str(k);
        if !v.is_empty() {
            out.push('=');
            out.push_str(v);
        }
    }
    out
}

/// Trims ASCII whitespace, vertical tab included.
fn trim_space(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_ascii_whitespace() || c == '\x0b')
}
