//! Cache Entry Module
//!
//! Defines the record stored for each key, with its access timestamp.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with value and access metadata.
///
/// The TTL is the same for every entry of a cache; it is copied in so that
/// an entry can answer "am I stale?" on its own.
#[derive(Debug, Clone)]
pub struct CacheEntry<K, V> {
    /// The key this entry is indexed under
    pub key: K,
    /// The stored value
    pub value: V,
    /// Last successful read or write
    pub last_access: Instant,
    /// Lifetime after the last access
    pub ttl: Duration,
}

impl<K, V> CacheEntry<K, V> {
    // == Constructor ==
    /// Creates a new entry stamped with `now`.
    pub fn new(key: K, value: V, ttl: Duration, now: Instant) -> Self {
        Self {
            key,
            value,
            last_access: now,
            ttl,
        }
    }

    // == Is Expired ==
    /// Checks if the entry is stale at `now`.
    ///
    /// An entry is stale once the time since its last access strictly
    /// exceeds the TTL; at exactly `ttl` it is still live.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_access) > self.ttl
    }

    // == Touch ==
    /// Refreshes the access timestamp.
    pub fn touch(&mut self, now: Instant) {
        self.last_access = now;
    }

    // == Time To Live ==
    /// Returns the remaining lifetime at `now`, zero once stale.
    pub fn ttl_remaining(&self, now: Instant) -> Duration {
        self.ttl
            .saturating_sub(now.saturating_duration_since(self.last_access))
    }
}
