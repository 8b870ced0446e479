//! Cache Module
//!
//! Provides the in-memory store of expirable values shared by lookups and
//! the invalidation watcher.

mod clock;
mod stats;
mod store;
mod value;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use stats::CacheStats;
pub use store::CacheStore;
pub use value::ExpirableValue;
