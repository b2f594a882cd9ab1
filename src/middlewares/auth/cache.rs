use std::sync::Arc;
use std::time::Duration;

use sea_orm::prelude::Uuid;

use crate::cache::{Cache, CacheKey, LocalCache};
use crate::config::AppConfig;

pub use super::extractor::SessionUser;

/// Write-through cache in front of the `sessions` table.
///
/// Entries are keyed by session id and expire on their own TTL, so a
/// hit skips the database entirely and a stale entry at worst lives for
/// `ttl` past a server-side change the owning code did not also purge.
#[derive(Clone, Debug)]
pub struct SessionCache {
    cache: Arc<LocalCache>,
    ttl: Duration,
}

impl SessionCache {
    pub fn new(cache: Arc<LocalCache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            cache: Arc::new(LocalCache::from_config(&config.cache)),
            ttl: Duration::from_secs(config.auth.session.cache_ttl),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    #[::tracing::instrument(skip(self), fields(session_id = %session_id))]
    pub async fn get(&self, session_id: Uuid) -> Option<SessionUser> {
        let key = CacheKey::session(session_id);

        match self.cache.get::<SessionUser>(&key).await {
            Ok(Some(user)) => {
                ::tracing::debug!("Session cache hit");
                Some(user)
            }
            Ok(None) => {
                ::tracing::debug!("Session cache miss");
                None
            }
            Err(e) => {
                ::tracing::error!(error = %e, "Failed to read session from cache");
                None
            }
        }
    }

    #[::tracing::instrument(skip(self, user), fields(session_id = %session_id, user_id = %user.user.id))]
    pub async fn set(&self, session_id: Uuid, user: &SessionUser) {
        let key = CacheKey::session(session_id);

        if let Err(e) = self.cache.set(&key, user, self.ttl).await {
            ::tracing::error!(error = %e, "Failed to cache session");
        }
    }

    /// Purge one session. Called on logout and when a session is
    /// revoked from another request.
    #[::tracing::instrument(skip(self), fields(session_id = %session_id))]
    pub async fn remove(&self, session_id: Uuid) {
        let key = CacheKey::session(session_id);

        if let Err(e) = self.cache.delete(&key).await {
            ::tracing::error!(error = %e, "Failed to remove session from cache");
        }
    }

    /// Purge one session after a delay.
    #[::tracing::instrument(skip(self), fields(session_id = %session_id, delay_secs = ?delay.as_secs()))]
    pub async fn remove_delay(&self, session_id: Uuid, delay: Duration) {
        let cache = self.cache.clone();

        actix::spawn(async move {
            actix::clock::sleep(delay).await;
            let key = CacheKey::session(session_id);

            if let Err(e) = cache.delete(&key).await {
                ::tracing::error!(error = %e, session_id = %session_id, "Failed to remove session from cache after delay");
            }
        });
    }
}
