mod local;

pub use local::LocalCache;

use std::fmt::Debug;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Generic cache trait for storing and retrieving data
#[async_trait]
pub trait Cache: Send + Sync + Debug {
    /// Get a value from the cache
    ///
    /// Returns None if the key doesn't exist or has expired
    async fn get<V>(&self, key: &str) -> Result<Option<V>>
    where
        V: for<'de> Deserialize<'de> + Send;

    /// Set a value in the cache with a TTL (time-to-live)
    ///
    /// The value will automatically expire after the specified duration
    async fn set<V>(&self, key: &str, value: &V, ttl: Duration) -> Result<()>
    where
        V: Serialize + Send + Sync;

    /// Delete a key from the cache
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check if a key exists in the cache
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Clear all keys from the cache
    async fn clear(&self) -> Result<()>;

    /// Get cache statistics
    async fn stats(&self) -> Result<CacheStats>;
}

/// Statistics about cache performance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    /// Total number of cache hits (successful gets)
    pub hits: u64,

    /// Total number of cache misses (failed gets)
    pub misses: u64,

    /// Total number of evictions (expired or displaced entries)
    pub evictions: u64,

    /// Current number of items in the cache
    pub size: usize,

    /// Hit rate as a percentage (0.0 to 1.0)
    pub hit_rate: f64,
}

impl CacheStats {
    /// Create new cache stats with zero values
    pub fn new() -> Self {
        Self {
            hits: 0,
            misses: 0,
            evictions: 0,
            size: 0,
            hit_rate: 0.0,
        }
    }

    /// Calculate hit rate from hits and misses
    pub fn calculate_hit_rate(&mut self) {
        let total = self.hits + self.misses;
        self.hit_rate = if total > 0 {
            self.hits as f64 / total as f64
        } else {
            0.0
        };
    }
}

impl Default for CacheStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for consistent cache key naming
pub struct CacheKey;

impl CacheKey {
    /// Build a session cache key
    pub fn session(id: impl std::fmt::Display) -> String {
        format!("session:{}", id)
    }

    /// Build a user cache key
    pub fn user(id: impl std::fmt::Display) -> String {
        format!("user:{}", id)
    }

    /// Build a custom cache key with a prefix
    pub fn custom(prefix: &str, key: impl std::fmt::Display) -> String {
        format!("{}:{}", prefix, key)
    }
}
