//! Store Backends
//!
//! Interchangeable [`CacheStore`](crate::cache::CacheStore) implementations.

mod file;
mod lru_memory;
mod memory;

pub use file::{FileStore, FileStoreConfig};
pub use lru_memory::{LruMemoryStore, LruMemoryStoreConfig};
pub use memory::MemoryStore;
