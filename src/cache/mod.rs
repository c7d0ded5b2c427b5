//! Cache Module
//!
//! Policy-driven response caching over interchangeable stores: an unbounded
//! map, a bounded LRU map and a JSON file.

mod context;
mod entry;
mod facade;
mod headers;
mod key;
mod lru;
mod policy;
mod stats;
mod store;
mod stores;


// Re-export public types
pub use context::{
    context_from_probe, context_from_probe_and_outcome, context_network_error, context_offline,
    context_online, CacheContext, NetworkProbe, RequestOutcome,
};
pub use entry::{current_timestamp_ms, CacheEntry};
pub use facade::Cache;
pub use headers::HeaderUtil;
pub use key::CacheKey;
pub use policy::CachePolicy;
pub use stats::CacheStats;
pub use store::CacheStore;
pub use stores::{FileStore, FileStoreConfig, LruMemoryStore, LruMemoryStoreConfig, MemoryStore};
