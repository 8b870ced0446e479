//! Expirable Value Module
//!
//! Pairs a stored value with the absolute instant it stops being live.

use chrono::{DateTime, Duration, Utc};

// == Expirable Value ==
/// An immutable value with an expiration instant.
///
/// Fields are private so a value can't be re-aged after construction;
/// `Put` with a fresh value is the only way to extend an entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpirableValue<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

impl<V> ExpirableValue<V> {
    // == Constructors ==
    /// Creates a value that expires at `expires_at`.
    pub fn new(value: V, expires_at: DateTime<Utc>) -> Self {
        Self { value, expires_at }
    }

    /// Creates a value that expires `ttl` after `now`.
    ///
    /// Saturates at the largest representable instant instead of overflowing.
    pub fn with_offset(value: V, now: DateTime<Utc>, ttl: Duration) -> Self {
        let expires_at = now
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self::new(value, expires_at)
    }

    // == Accessors ==
    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    // == Liveness ==
    /// Checks if the value is live at `now`.
    ///
    /// Boundary condition: at exactly `expires_at` the value is already stale,
    /// so once the full TTL has elapsed a reader never sees it.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Remaining lifetime at `now`, zero once stale.
    pub fn ttl_remaining(&self, now: DateTime<Utc>) -> Duration {
        if self.is_live(now) {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }
}
