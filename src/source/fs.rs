//! Filesystem-backed content source.

use std::fs;
use std::io;
use std::path::PathBuf;

use super::ContentSource;

/// Resolves keys as paths relative to a base directory.
///
/// With the default base of `.`, a key such as `./public/index.html` is
/// opened relative to the working directory.
#[derive(Debug, Clone)]
pub struct FsContentSource {
    base: PathBuf,
}

impl FsContentSource {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base.join(key)
    }
}

impl Default for FsContentSource {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ContentSource for FsContentSource {
    fn exists(&self, key: &str) -> bool {
        self.path_for(key).exists()
    }

    fn is_container(&self, key: &str) -> bool {
        // Anything that isn't a plain file (directories, sockets, fifos)
        // can't be served as one blob
        fs::metadata(self.path_for(key))
            .map(|meta| !meta.is_file())
            .unwrap_or(false)
    }

    fn size(&self, key: &str) -> io::Result<u64> {
        fs::metadata(self.path_for(key)).map(|meta| meta.len())
    }

    fn read_all(&self, key: &str) -> io::Result<Vec<u8>> {
        fs::read(self.path_for(key))
    }
}
