//! Offline Cache - a local, policy-driven response cache
//!
//! Decides whether a stored response may be reused given its age and the
//! caller's network situation (fresh, stale-if-error, stale-if-offline), and
//! stores responses in memory, in a bounded LRU map or in a JSON file.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheContext, CacheEntry, CacheKey, CachePolicy, CacheStore};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_prune_task;
