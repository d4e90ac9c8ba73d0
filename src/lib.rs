//! ttl_lru - A bounded, thread-safe in-memory cache
//!
//! Combines least-recently-used capacity eviction with time-to-live expiration
//! that is checked lazily on lookup.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::Cache;
pub use config::CacheConfig;
pub use error::{CacheError, Result};
