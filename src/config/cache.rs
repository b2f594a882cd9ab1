use serde::{Deserialize, Serialize};

use super::{ConfigError, Validate};

/// Session cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of cached entries
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
    /// Default TTL for cached entries in seconds
    #[serde(default = "default_cache_ttl")]
    pub ttl: u64,
    /// Expired-entry sweep interval in seconds
    #[serde(default = "default_cache_cleanup_interval")]
    pub cleanup_interval: u64,
}

fn default_cache_capacity() -> usize {
    10_000
}

fn default_cache_ttl() -> u64 {
    300 // 5 minutes
}

fn default_cache_cleanup_interval() -> u64 {
    60
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
            ttl: default_cache_ttl(),
            cleanup_interval: default_cache_cleanup_interval(),
        }
    }
}

impl Validate for CacheConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ValidationError(
                "cache.capacity must be > 0".to_string(),
            ));
        }
        if self.ttl == 0 {
            return Err(ConfigError::ValidationError(
                "cache.ttl must be > 0".to_string(),
            ));
        }
        if self.cleanup_interval == 0 {
            return Err(ConfigError::ValidationError(
                "cache.cleanup_interval must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
