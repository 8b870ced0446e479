//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::str::FromStr;

/// 80 MiB, the default ceiling for a single cached item.
pub const DEFAULT_MAX_ENTRY_BYTES: u64 = 80 * 1024 * 1024;

/// One hour, in seconds.
pub const DEFAULT_ENTRY_TTL: u64 = 60 * 60;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory of the content source, also used as the key prefix
    pub content_root: String,
    /// Key served for an empty or root request path
    pub default_key: String,
    /// Items of this many bytes or more are read through, never cached
    pub max_entry_bytes: u64,
    /// Time-to-live in seconds applied to every loaded entry
    pub entry_ttl: u64,
    /// Interval in seconds between sweeps of expired entries
    pub reap_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CONTENT_ROOT` - Content root directory (default: ./public)
    /// - `DEFAULT_KEY` - Key for the root request path (default: index.html)
    /// - `MAX_ENTRY_BYTES` - Cacheable size ceiling in bytes (default: 80 MiB)
    /// - `ENTRY_TTL` - Entry TTL in seconds (default: 3600)
    /// - `REAP_INTERVAL` - Expired entry sweep frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            content_root: env::var("CONTENT_ROOT")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.content_root),
            default_key: env::var("DEFAULT_KEY")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.default_key),
            max_entry_bytes: parse_var("MAX_ENTRY_BYTES").unwrap_or(defaults.max_entry_bytes),
            entry_ttl: parse_var("ENTRY_TTL").unwrap_or(defaults.entry_ttl),
            reap_interval: parse_var("REAP_INTERVAL").unwrap_or(defaults.reap_interval),
        }
    }

    /// Entry TTL as a chrono duration, ready for `CacheStore::put`.
    pub fn ttl(&self) -> chrono::Duration {
        let secs = i64::try_from(self.entry_ttl).unwrap_or(i64::MAX);
        chrono::Duration::try_seconds(secs).unwrap_or(chrono::Duration::MAX)
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_root: "./public".to_string(),
            default_key: "index.html".to_string(),
            max_entry_bytes: DEFAULT_MAX_ENTRY_BYTES,
            entry_ttl: DEFAULT_ENTRY_TTL,
            reap_interval: 60,
        }
    }
}
