//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the cache.
//!
//! # Tasks
//! - Prune: Removes entries that are past every staleness window

mod prune;

pub use prune::spawn_prune_task;
