//! In-process cache with per-key expiry. Holds revoked session ids.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use bloghaven_core::ports::{Cache, CacheError};

struct CacheEntry {
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }
}

/// HashMap-backed key expiry table behind an async RwLock.
///
/// Contents are lost on restart; sessions logged out before a restart become
/// valid again until their tokens expire.
pub struct InMemoryCache {
    store: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn set(&self, key: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let now = Instant::now();
        let expires_at = ttl.map(|d| now + d);

        let mut store = self.store.write().await;
        // Revoked session keys are never read back once expired; prune on write.
        store.retain(|_, entry| !entry.is_expired(now));
        store.insert(key.to_string(), CacheEntry { expires_at });

        Ok(())
    }

    async fn exists(&self, key: &str) -> bool {
        self.store
            .read()
            .await
            .get(key)
            .is_some_and(|entry| !entry.is_expired(Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_exists() {
        let cache = InMemoryCache::new();
        assert!(!cache.exists("session:1").await);
        cache.set("session:1", None).await.unwrap();
        assert!(cache.exists("session:1").await);
        assert!(!cache.exists("session:2").await);
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let cache = InMemoryCache::new();
        cache
            .set("short", Some(Duration::from_millis(0)))
            .await
            .unwrap();
        cache
            .set("long", Some(Duration::from_secs(3600)))
            .await
            .unwrap();

        assert!(!cache.exists("short").await);
        assert!(cache.exists("long").await);
    }

    #[tokio::test]
    async fn test_set_prunes_expired_entries() {
        let cache = InMemoryCache::new();
        cache.set("a", Some(Duration::ZERO)).await.unwrap();
        cache.set("b", None).await.unwrap();

        assert_eq!(cache.store.read().await.len(), 1);
        assert!(cache.exists("b").await);
    }
}
