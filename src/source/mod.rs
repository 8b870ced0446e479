//! Content Source Module
//!
//! The capability the loader needs from whatever holds the real bytes.

mod fs;

pub use fs::FsContentSource;

// == Content Source ==
/// Read access to the items behind cache keys.
///
/// Implementations must be shareable across request tasks.
pub trait ContentSource: Send + Sync {
    /// Whether anything exists at `key`.
    fn exists(&self, key: &str) -> bool;

    /// Whether `key` is a container (directory) rather than a single blob.
    fn is_container(&self, key: &str) -> bool;

    /// Byte size of the item at `key`.
    fn size(&self, key: &str) -> std::io::Result<u64>;

    /// Reads the whole item at `key`.
    fn read_all(&self, key: &str) -> std::io::Result<Vec<u8>>;
}
