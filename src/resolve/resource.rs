//! Resolved resource types.

use std::fmt;
use std::sync::Arc;

// == Resource ==
/// A fully materialized content-source item.
///
/// Bytes are shared, so handing a cached resource to many requests copies
/// nothing but the metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// Cache key the bytes were read from
    pub key: String,
    /// Complete item contents
    pub bytes: Arc<[u8]>,
    /// MIME type guessed from the key's extension
    pub content_type: String,
}

impl Resource {
    pub fn new(key: impl Into<String>, bytes: Vec<u8>) -> Self {
        let key = key.into();
        let content_type = mime_guess::from_path(&key)
            .first_or_octet_stream()
            .to_string();
        Self {
            key,
            bytes: bytes.into(),
            content_type,
        }
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

// == Origin ==
/// Where a resolved resource came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Served from a live cache entry
    Cache,
    /// Loaded from the content source and cached
    Loaded,
    /// Read from the content source without caching (oversized)
    ReadThrough,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Cache => write!(f, "cache"),
            Origin::Loaded => write!(f, "loaded"),
            Origin::ReadThrough => write!(f, "read-through"),
        }
    }
}

/// Result of a successful lookup.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub resource: Resource,
    pub origin: Origin,
}
