//! Shared Cache Module
//!
//! Thread-safe front end over [`CacheStore`].

use std::borrow::Borrow;
use std::hash::Hash;
use std::time::Duration;

use parking_lot::Mutex;

use crate::cache::CacheStore;
use crate::config::CacheConfig;
use crate::error::Result;

// == Cache ==
/// Bounded LRU cache with TTL expiration, safe to share between threads.
///
/// Every operation holds one exclusive lock for its whole duration, so a
/// lookup's expiry check and the removal or refresh that follows it are
/// atomic. Share the cache between threads with `Arc<Cache<K, V>>`.
///
/// Expired entries are only purged when a lookup finds them; there is no
/// background sweeper.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use ttl_lru::Cache;
///
/// let cache = Cache::new(2, Duration::from_secs(60)).unwrap();
/// cache.set("a", 1);
/// cache.set("b", 2);
/// assert_eq!(cache.get("a"), Some(1));
///
/// // "b" is now least recently used and makes room for "c"
/// cache.set("c", 3);
/// assert_eq!(cache.get("b"), None);
/// ```
#[derive(Debug)]
pub struct Cache<K, V> {
    store: Mutex<CacheStore<K, V>>,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries, each valid
    /// for `ttl` after its last access.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidCapacity` if `capacity` is zero.
    pub fn new(capacity: usize, ttl: Duration) -> Result<Self> {
        CacheStore::new(capacity, ttl).map(Self::from_store)
    }

    /// Creates an empty cache from a configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        CacheStore::from_config(config).map(Self::from_store)
    }

    fn from_store(store: CacheStore<K, V>) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    // == Set ==
    /// Inserts or overwrites the value for `key`, evicting the least
    /// recently used entry if the cache grows past capacity.
    pub fn set(&self, key: K, value: V) {
        self.store.lock().set(key, value);
    }

    // == Get ==
    /// Returns a copy of the value for `key`, or None if it is missing or
    /// has expired.
    ///
    /// Store `Arc<T>` values to hand out shared immutable handles instead of
    /// deep copies.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.store.lock().get(key).cloned()
    }

    // == Remove ==
    /// Removes `key`, returning its value if it was resident.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.lock().remove(key)
    }

    // == Clear ==
    /// Removes every entry. Capacity and TTL are unchanged.
    pub fn clear(&self) {
        self.store.lock().clear();
    }

    // == Accessors ==
    /// Number of resident entries, including expired ones not yet looked up.
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.store.lock().capacity()
    }

    pub fn ttl(&self) -> Duration {
        self.store.lock().ttl()
    }

    /// Snapshot of resident keys from least to most recently used.
    pub fn keys(&self) -> Vec<K> {
        self.store.lock().keys()
    }

    /// Checks that the key index and the recency list agree.
    pub fn is_consistent(&self) -> bool {
        self.store.lock().is_consistent()
    }
}
