//! Configuration Module
//!
//! Loads cache configuration from environment variables and builds the
//! policy and store from it.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::cache::{
    Cache, CachePolicy, CacheStore, FileStore, FileStoreConfig, LruMemoryStore,
    LruMemoryStoreConfig, MemoryStore,
};
use crate::error::{CacheError, Result};

/// Which [`CacheStore`] implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Unbounded in-memory map
    Memory,
    /// Bounded in-memory LRU map
    Lru,
    /// JSON file on disk
    File,
}

impl FromStr for StoreBackend {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "lru" => Ok(StoreBackend::Lru),
            "file" => Ok(StoreBackend::File),
            other => Err(CacheError::InvalidConfig(format!(
                "unknown cache backend '{}' (expected memory, lru or file)",
                other
            ))),
        }
    }
}

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Store implementation
    pub backend: StoreBackend,
    /// File used by the file backend
    pub file_path: PathBuf,
    /// Pretty-print the cache file
    pub pretty_json: bool,
    /// Capacity of the LRU backend
    pub max_entries: usize,
    /// Freshness window in milliseconds
    pub ttl_ms: i64,
    /// Stale-if-error window in milliseconds
    pub stale_if_error_ms: i64,
    /// Stale-if-offline window in milliseconds
    pub stale_if_offline_ms: i64,
    /// Serve stale entries after network errors
    pub allow_stale_if_error: bool,
    /// Serve stale entries while offline
    pub allow_stale_if_offline: bool,
    /// Background prune task interval in seconds
    pub prune_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_BACKEND` - `memory`, `lru` or `file` (default: file)
    /// - `CACHE_FILE_PATH` - Cache file (default: ./.vix/cache_http.json)
    /// - `CACHE_PRETTY_JSON` - Pretty-print the file (default: false)
    /// - `CACHE_MAX_ENTRIES` - LRU capacity (default: 1024)
    /// - `CACHE_TTL_MS` - Freshness window (default: 60000)
    /// - `CACHE_STALE_IF_ERROR_MS` - Stale-if-error window (default: 300000)
    /// - `CACHE_STALE_IF_OFFLINE_MS` - Stale-if-offline window (default: 600000)
    /// - `CACHE_ALLOW_STALE_IF_ERROR` - (default: true)
    /// - `CACHE_ALLOW_STALE_IF_OFFLINE` - (default: true)
    /// - `PRUNE_INTERVAL` - Prune frequency in seconds (default: 60)
    ///
    /// Unparseable values fall back to their default; only an unknown
    /// backend name is an error.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let backend = match env::var("CACHE_BACKEND") {
            Ok(v) => v.parse()?,
            Err(_) => defaults.backend,
        };

        Ok(Self {
            backend,
            file_path: env::var("CACHE_FILE_PATH")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.file_path),
            pretty_json: env::var("CACHE_PRETTY_JSON")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.pretty_json),
            max_entries: parsed("CACHE_MAX_ENTRIES").unwrap_or(defaults.max_entries),
            ttl_ms: parsed("CACHE_TTL_MS").unwrap_or(defaults.ttl_ms),
            stale_if_error_ms: parsed("CACHE_STALE_IF_ERROR_MS")
                .unwrap_or(defaults.stale_if_error_ms),
            stale_if_offline_ms: parsed("CACHE_STALE_IF_OFFLINE_MS")
                .unwrap_or(defaults.stale_if_offline_ms),
            allow_stale_if_error: env::var("CACHE_ALLOW_STALE_IF_ERROR")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.allow_stale_if_error),
            allow_stale_if_offline: env::var("CACHE_ALLOW_STALE_IF_OFFLINE")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.allow_stale_if_offline),
            prune_interval: parsed("PRUNE_INTERVAL").unwrap_or(defaults.prune_interval),
        })
    }

    pub fn policy(&self) -> CachePolicy {
        CachePolicy {
            ttl_ms: self.ttl_ms,
            stale_if_error_ms: self.stale_if_error_ms,
            stale_if_offline_ms: self.stale_if_offline_ms,
            allow_stale_if_error: self.allow_stale_if_error,
            allow_stale_if_offline: self.allow_stale_if_offline,
        }
    }

    pub fn file_store_config(&self) -> FileStoreConfig {
        FileStoreConfig {
            file_path: self.file_path.clone(),
            pretty_json: self.pretty_json,
        }
    }

    pub fn lru_store_config(&self) -> LruMemoryStoreConfig {
        LruMemoryStoreConfig {
            max_entries: self.max_entries,
        }
    }

    /// Builds the configured store behind a shared handle.
    pub fn build_store(&self) -> Arc<dyn CacheStore> {
        match self.backend {
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
            StoreBackend::Lru => Arc::new(LruMemoryStore::new(self.lru_store_config())),
            StoreBackend::File => Arc::new(FileStore::new(self.file_store_config())),
        }
    }

    /// Builds a [`Cache`] over a freshly built store.
    pub fn build_cache(&self) -> Cache {
        Cache::new(self.policy(), self.build_store())
    }
}

impl Default for Config {
    fn default() -> Self {
        let policy = CachePolicy::default();
        let file = FileStoreConfig::default();
        Self {
            backend: StoreBackend::File,
            file_path: file.file_path,
            pretty_json: file.pretty_json,
            max_entries: LruMemoryStoreConfig::default().max_entries,
            ttl_ms: policy.ttl_ms,
            stale_if_error_ms: policy.stale_if_error_ms,
            stale_if_offline_ms: policy.stale_if_offline_ms,
            allow_stale_if_error: policy.allow_stale_if_error,
            allow_stale_if_offline: policy.allow_stale_if_offline,
            prune_interval: 60,
        }
    }
}

fn parsed<T: FromStr>(var: &str) -> Option<T> {
    env::var(var).ok().and_then(|v| v.trim().parse().ok())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
