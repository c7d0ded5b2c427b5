//! Error types for the cache
//!
//! Provides unified error handling using thiserror. A cache miss is never an
//! error; only storage and configuration faults end up here.

use std::path::PathBuf;

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache stores and configuration.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Reading, writing or creating the backing file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Entries could not be encoded for persistence
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A store mutex was poisoned by a panicking thread
    #[error("Lock poisoned: {0}")]
    LockPoisoned(&'static str),

    /// Configuration value could not be used
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CacheError {
    /// Wraps an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CacheError::Io {
            path: path.into(),
            source,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
