//! Configuration Module
//!
//! Holds the construction parameters of a cache: how many entries it may
//! hold and how long an untouched entry stays valid.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Default maximum number of entries.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Default time-to-live for entries.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Cache configuration parameters.
///
/// Serializes with the TTL as whole milliseconds so it can be embedded in a
/// host service's own configuration file:
///
/// ```json
/// { "capacity": 512, "ttl_ms": 30000 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Time an entry stays valid after its last access
    #[serde(rename = "ttl_ms", with = "millis")]
    pub ttl: Duration,
}

impl CacheConfig {
    /// Creates a new config with the given capacity and TTL.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self { capacity, ttl }
    }

    /// Checks that the parameters describe a usable cache.
    ///
    /// A zero capacity is rejected rather than clamped. A zero TTL is
    /// allowed; every entry then goes stale as soon as time advances.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidCapacity(self.capacity));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            ttl: DEFAULT_TTL,
        }
    }
}

// == Duration <-> milliseconds ==
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ttl: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(ms)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
