use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::config::CacheConfig;

use super::{Cache, CacheStats};

/// Internal cache entry with expiration
#[derive(Debug, Clone)]
struct CacheEntry {
    /// Serialized data using bincode
    data: Vec<u8>,
    /// Expiration timestamp
    expires_at: Instant,
}

impl CacheEntry {
    /// Create a new cache entry with TTL
    fn new(data: Vec<u8>, ttl: Duration) -> Self {
        Self {
            data,
            expires_at: Instant::now() + ttl,
        }
    }

    /// Check if the entry has expired
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Local in-memory cache using DashMap
#[derive(Debug)]
pub struct LocalCache {
    /// DashMap storage with configurable shards
    store: Arc<DashMap<String, CacheEntry>>,
    /// Soft upper bound on the number of entries
    capacity: usize,
    /// Cache hit counter
    hits: Arc<AtomicU64>,
    /// Cache miss counter
    misses: Arc<AtomicU64>,
    /// Eviction counter
    evictions: Arc<AtomicU64>,
    /// Background cleanup task handle
    cleanup_handle: Option<JoinHandle<()>>,
}

impl LocalCache {
    /// Create a new LocalCache with default capacity and sweep interval
    pub fn new() -> Self {
        Self::with_options(10_000, Duration::from_secs(60))
    }

    /// Create a new LocalCache from the cache config section
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::with_options(
            config.capacity,
            Duration::from_secs(config.cleanup_interval),
        )
    }

    /// Create a new LocalCache with explicit capacity and sweep interval
    pub fn with_options(capacity: usize, cleanup_interval: Duration) -> Self {
        // DashMap requires a power-of-two shard count
        let shards = (num_cpus::get() * 4).next_power_of_two();
        let store = Arc::new(DashMap::with_shard_amount(shards));
        let hits = Arc::new(AtomicU64::new(0));
        let misses = Arc::new(AtomicU64::new(0));
        let evictions = Arc::new(AtomicU64::new(0));

        let cleanup_handle =
            Self::start_cleanup_task(Arc::clone(&store), Arc::clone(&evictions), cleanup_interval);

        Self {
            store,
            capacity,
            hits,
            misses,
            evictions,
            cleanup_handle: Some(cleanup_handle),
        }
    }

    /// Start background task that sweeps expired entries
    fn start_cleanup_task(
        store: Arc<DashMap<String, CacheEntry>>,
        evictions: Arc<AtomicU64>,
        every: Duration,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);

            loop {
                interval.tick().await;

                let mut expired_keys = Vec::new();

                for entry in store.iter() {
                    if entry.value().is_expired() {
                        expired_keys.push(entry.key().clone());
                    }
                }

                for key in expired_keys {
                    store.remove(&key);
                    evictions.fetch_add(1, Ordering::Relaxed);
                }
            }
        })
    }

    /// Evict one entry to make room: an expired one when available,
    /// otherwise the entry closest to expiry.
    fn evict_one(&self) {
        let mut victim: Option<(String, Instant)> = None;

        for entry in self.store.iter() {
            if entry.value().is_expired() {
                victim = Some((entry.key().clone(), entry.value().expires_at));
                break;
            }

            match &victim {
                Some((_, expires_at)) if *expires_at <= entry.value().expires_at => {}
                _ => victim = Some((entry.key().clone(), entry.value().expires_at)),
            }
        }

        if let Some((key, _)) = victim {
            self.store.remove(&key);
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl Default for LocalCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LocalCache {
    fn drop(&mut self) {
        // Abort cleanup task when LocalCache is dropped
        if let Some(handle) = self.cleanup_handle.take() {
            handle.abort();
        }
    }
}

#[async_trait]
impl Cache for LocalCache {
    async fn get<V>(&self, key: &str) -> Result<Option<V>>
    where
        V: for<'de> Deserialize<'de> + Send,
    {
        if let Some(entry) = self.store.get(key) {
            if entry.is_expired() {
                drop(entry);
                self.store.remove(key);
                self.evictions.fetch_add(1, Ordering::Relaxed);
                self.misses.fetch_add(1, Ordering::Relaxed);
                return Ok(None);
            }

            let value: V =
                bincode::deserialize(&entry.data).context("Failed to deserialize cached value")?;

            self.hits.fetch_add(1, Ordering::Relaxed);
            Ok(Some(value))
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            Ok(None)
        }
    }

    async fn set<V>(&self, key: &str, value: &V, ttl: Duration) -> Result<()>
    where
        V: Serialize + Send + Sync,
    {
        let data = bincode::serialize(value).context("Failed to serialize value")?;

        if !self.store.contains_key(key) && self.store.len() >= self.capacity {
            self.evict_one();
        }

        let entry = CacheEntry::new(data, ttl);

        self.store.insert(key.to_string(), entry);

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.store.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        if let Some(entry) = self.store.get(key) {
            if entry.is_expired() {
                drop(entry);
                self.store.remove(key);
                self.evictions.fetch_add(1, Ordering::Relaxed);
                Ok(false)
            } else {
                Ok(true)
            }
        } else {
            Ok(false)
        }
    }

    async fn clear(&self) -> Result<()> {
        self.store.clear();
        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats> {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let evictions = self.evictions.load(Ordering::Relaxed);
        let size = self.store.len();

        let mut stats = CacheStats {
            hits,
            misses,
            evictions,
            size,
            hit_rate: 0.0,
        };

        stats.calculate_hit_rate();

        Ok(stats)
    }
}
