//! Cache Store Module
//!
//! Main cache engine combining a HashMap index with an LRU list and TTL expiration.
//!
//! The store itself is not synchronized; [`Cache`](crate::cache::Cache) puts
//! it behind a lock.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::cache::{CacheEntry, LruList, Slot};
use crate::config::CacheConfig;
use crate::error::Result;

// == Cache Store ==
/// Cache storage with LRU eviction and lazy TTL expiration.
///
/// `index` and `order` always hold the same set of keys, each exactly once.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key -> position in the recency list
    index: HashMap<K, Slot>,
    /// Entries from least to most recently used
    order: LruList<CacheEntry<K, V>>,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Lifetime of an entry after its last access
    ttl: Duration,
}

impl<K, V> CacheStore<K, V>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and TTL.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidCapacity` if `capacity` is zero.
    pub fn new(capacity: usize, ttl: Duration) -> Result<Self> {
        Self::from_config(&CacheConfig::new(capacity, ttl))
    }

    /// Creates a new CacheStore from a validated configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        debug!(
            capacity = config.capacity,
            ttl_ms = config.ttl.as_millis() as u64,
            "Cache store created"
        );

        Ok(Self {
            index: HashMap::new(),
            order: LruList::new(),
            capacity: config.capacity,
            ttl: config.ttl,
        })
    }

    // == Set ==
    /// Stores a key-value pair.
    ///
    /// Any previous record for the key is dropped and replaced by a fresh one
    /// at the most recently used end. If the cache then holds more than
    /// `capacity` entries, the least recently used entry is evicted whether
    /// or not it has expired.
    pub fn set(&mut self, key: K, value: V) {
        let now = Instant::now();

        // Overwrite: unlink the superseded record so the key appears once
        self.remove_by_key(&key);

        let entry = CacheEntry::new(key.clone(), value, self.ttl, now);
        let slot = self.order.push_back(entry);
        self.index.insert(key, slot);

        if self.order.len() > self.capacity {
            self.evict_oldest();
        }
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// A live entry has its timestamp refreshed and becomes the most recently
    /// used. A stale entry is removed and reported as absent.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(&slot) = self.index.get(key) else {
            trace!("Cache miss");
            return None;
        };

        let now = Instant::now();
        let expired = self
            .order
            .get(slot)
            .map_or(true, |entry| entry.is_expired_at(now));

        if expired {
            self.remove_by_key(key);
            debug!(remaining = self.order.len(), "Expired entry removed on access");
            return None;
        }

        trace!("Cache hit");
        self.order.move_to_back(slot);
        let entry = self.order.get_mut(slot)?;
        entry.touch(now);
        Some(&entry.value)
    }

    // == Remove ==
    /// Removes an entry by key, returning its value if it was resident.
    ///
    /// Stale entries that were never looked up are still returned.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove_by_key(key).map(|entry| entry.value)
    }

    // == Clear ==
    /// Removes all entries. Capacity and TTL are kept.
    pub fn clear(&mut self) {
        let dropped = self.order.len();
        self.index.clear();
        self.order.clear();
        debug!(dropped, "Cache cleared");
    }

    // == Length ==
    /// Returns the number of resident entries, including stale ones not yet
    /// discovered by a lookup.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Keys ==
    /// Returns resident keys from least to most recently used.
    ///
    /// Does not refresh or expire anything.
    pub fn keys(&self) -> Vec<K> {
        self.order.iter().map(|entry| entry.key.clone()).collect()
    }

    // == Consistency Check ==
    /// Verifies that the index and the recency list agree.
    ///
    /// True when both hold the same keys, each exactly once, and the entry
    /// count is within capacity.
    pub fn is_consistent(&self) -> bool {
        self.index.len() == self.order.len()
            && self.order.iter().count() == self.order.len()
            && self.order.len() <= self.capacity
            && self.index.iter().all(|(key, &slot)| {
                self.order
                    .get(slot)
                    .is_some_and(|entry| entry.key == *key)
            })
    }

    // == Evict Oldest ==
    /// Drops the least recently used entry. No-op on an empty cache.
    fn evict_oldest(&mut self) {
        if let Some(entry) = self.order.pop_front() {
            self.index.remove(&entry.key);
            debug!(capacity = self.capacity, "Evicted least recently used entry");
        }
    }

    // == Remove By Key ==
    /// Unlinks the entry for `key` from both structures, if present.
    fn remove_by_key<Q>(&mut self, key: &Q) -> Option<CacheEntry<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = self.index.remove(key)?;
        self.order.remove(slot)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use std::thread::sleep;

    fn store(capacity: usize) -> CacheStore<String, String> {
        CacheStore::new(capacity, Duration::from_secs(300)).unwrap()
    }

    #[test]
    fn test_store_new() {
        let store = store(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 100);
        assert_eq!(store.ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_store_zero_capacity_rejected() {
        let result = CacheStore::<String, String>::new(0, Duration::from_secs(1));
        assert!(matches!(result, Err(CacheError::InvalidCapacity(0))));
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = store(100);

        store.set("key1".to_string(), "value1".to_string());
        let value = store.get("key1");

        assert_eq!(value.map(String::as_str), Some("value1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = store(100);
        assert!(store.get("nonexistent").is_none());
    }

    #[test]
    fn test_store_remove() {
        let mut store = store(100);

        store.set("key1".to_string(), "value1".to_string());
        assert_eq!(store.remove("key1"), Some("value1".to_string()));

        assert!(store.is_empty());
        assert!(store.get("key1").is_none());
        assert!(store.is_consistent());
    }

    #[test]
    fn test_store_remove_nonexistent() {
        let mut store = store(100);
        assert_eq!(store.remove("nonexistent"), None);
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = store(100);

        store.set("key1".to_string(), "value1".to_string());
        store.set("key1".to_string(), "value2".to_string());

        assert_eq!(store.len(), 1);
        assert_eq!(store.keys(), vec!["key1".to_string()]);
        assert!(store.is_consistent());
        assert_eq!(store.get("key1").map(String::as_str), Some("value2"));
    }

    #[test]
    fn test_store_overwrite_refreshes_recency() {
        let mut store = store(2);

        store.set("key1".to_string(), "value1".to_string());
        store.set("key2".to_string(), "value2".to_string());
        store.set("key1".to_string(), "value1b".to_string());

        // Overwrite does not count toward capacity
        assert_eq!(store.len(), 2);

        // key2 is now least recently used
        store.set("key3".to_string(), "value3".to_string());
        assert!(store.get("key2").is_none());
        assert_eq!(store.get("key1").map(String::as_str), Some("value1b"));
        assert!(store.get("key3").is_some());
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = CacheStore::new(100, Duration::from_millis(50)).unwrap();

        store.set("key1".to_string(), "value1".to_string());

        // Should be accessible immediately
        assert!(store.get("key1").is_some());

        // Wait for expiration
        sleep(Duration::from_millis(120));

        assert!(store.get("key1").is_none());
        // Fully removed, not just hidden
        assert!(store.is_empty());
        assert!(store.get("key1").is_none());
        assert!(store.is_consistent());
    }

    #[test]
    fn test_store_get_refreshes_ttl() {
        let mut store = CacheStore::new(100, Duration::from_millis(200)).unwrap();

        store.set("key1".to_string(), "value1".to_string());

        // Each access lands well inside the TTL and restarts it
        for _ in 0..3 {
            sleep(Duration::from_millis(100));
            assert!(store.get("key1").is_some());
        }
    }

    #[test]
    fn test_store_stale_entries_stay_resident() {
        let mut store = CacheStore::new(100, Duration::from_millis(20)).unwrap();

        store.set("key1".to_string(), "value1".to_string());
        store.set("key2".to_string(), "value2".to_string());
        sleep(Duration::from_millis(60));

        // Expiry is lazy: nothing is purged until a lookup finds it
        assert_eq!(store.len(), 2);
        assert!(store.get("key1").is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(store.keys(), vec!["key2".to_string()]);
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = store(3);

        store.set("key1".to_string(), "value1".to_string());
        store.set("key2".to_string(), "value2".to_string());
        store.set("key3".to_string(), "value3".to_string());

        // Cache is full, adding key4 should evict key1 (oldest)
        store.set("key4".to_string(), "value4".to_string());

        assert_eq!(store.len(), 3);
        assert!(store.get("key1").is_none());
        assert!(store.get("key2").is_some());
        assert!(store.get("key3").is_some());
        assert!(store.get("key4").is_some());
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let mut store = store(3);

        store.set("key1".to_string(), "value1".to_string());
        store.set("key2".to_string(), "value2".to_string());
        store.set("key3".to_string(), "value3".to_string());

        // Access key1 to make it most recently used
        store.get("key1");
        assert_eq!(
            store.keys(),
            vec!["key2".to_string(), "key3".to_string(), "key1".to_string()]
        );

        // Adding key4 should evict key2 (now oldest)
        store.set("key4".to_string(), "value4".to_string());

        assert!(store.get("key1").is_some());
        assert!(store.get("key2").is_none());
    }

    #[test]
    fn test_store_capacity_evicts_unvisited_stale_entry() {
        let mut store = CacheStore::new(2, Duration::from_millis(50)).unwrap();

        store.set("stale".to_string(), "value".to_string());
        sleep(Duration::from_millis(100));
        store.set("fresh1".to_string(), "value".to_string());
        store.set("fresh2".to_string(), "value".to_string());

        // Evicted by capacity pressure without ever being looked up
        assert_eq!(store.len(), 2);
        assert_eq!(
            store.keys(),
            vec!["fresh1".to_string(), "fresh2".to_string()]
        );
    }

    #[test]
    fn test_store_capacity_one() {
        let mut store = store(1);

        store.set("key1".to_string(), "value1".to_string());
        store.set("key2".to_string(), "value2".to_string());

        assert_eq!(store.len(), 1);
        assert!(store.get("key1").is_none());
        assert_eq!(store.get("key2").map(String::as_str), Some("value2"));
    }

    #[test]
    fn test_store_clear() {
        let mut store = store(2);

        store.set("key1".to_string(), "value1".to_string());
        store.set("key2".to_string(), "value2".to_string());
        store.clear();

        assert!(store.is_empty());
        assert!(store.get("key1").is_none());
        assert!(store.get("key2").is_none());
        assert_eq!(store.capacity(), 2);

        // Full capacity is available again
        store.set("key3".to_string(), "value3".to_string());
        store.set("key4".to_string(), "value4".to_string());
        assert_eq!(store.len(), 2);
        assert!(store.get("key3").is_some());
        assert!(store.is_consistent());
    }

    #[test]
    fn test_store_clear_empty() {
        let mut store = store(2);
        store.clear();
        assert!(store.is_empty());
        assert!(store.is_consistent());
    }

    #[test]
    fn test_store_evict_oldest_empty() {
        let mut store = store(2);
        store.evict_oldest();
        assert!(store.is_empty());
        assert!(store.is_consistent());
    }
}
