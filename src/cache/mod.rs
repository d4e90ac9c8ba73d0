//! Cache Module
//!
//! Provides a bounded in-memory cache with LRU eviction and lazy TTL expiration.

mod entry;
mod lru;
mod shared;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use lru::{Iter, LruList, Slot};
pub use shared::Cache;
pub use store::CacheStore;
