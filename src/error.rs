//! Error types for the resource cache
//!
//! Provides unified error handling using thiserror.

use std::path::PathBuf;

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for lookups and the invalidation watcher.
///
/// Store operations never fail; every variant here comes from the loader,
/// the content source or the watcher's startup.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key is absent at the content source
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Key denotes a directory or another item that cannot be read as one blob
    #[error("Resource not readable: {0}")]
    NotReadable(String),

    /// Item is at or above the cacheable size ceiling
    #[error("Resource too large to cache: {key} is {size} bytes (limit {limit})")]
    TooLarge { key: String, size: u64, limit: u64 },

    /// Underlying read from the content source failed
    #[error("Failed to read {key}: {source}")]
    SourceIo {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Watcher could not resolve its root or subscribe to changes
    #[error("Failed to start watcher on {path}: {reason}")]
    WatcherInit { path: PathBuf, reason: String },
}

impl CacheError {
    /// Wraps an I/O error raised while touching `key`.
    pub fn source_io(key: impl Into<String>, source: std::io::Error) -> Self {
        CacheError::SourceIo {
            key: key.into(),
            source,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the resource cache.
pub type Result<T> = std::result::Result<T, CacheError>;
