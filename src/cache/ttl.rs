//! In-process TTL cache on `cached::stores::ExpiringSizedCache`
//!
//! Entries carry their own TTL. When the size bound is reached, expired
//! entries are evicted first, then the entries closest to expiry.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use cached::stores::ExpiringSizedCache;

use super::keys::ACCOUNT_TTL;
use super::{Cache, CacheError};

/// Thread-safe byte cache with per-entry TTL.
pub struct TtlCache {
    store: Mutex<ExpiringSizedCache<String, Vec<u8>>>,
}

impl TtlCache {
    pub fn new(max_entries: usize) -> Self {
        let mut store = ExpiringSizedCache::new(ACCOUNT_TTL.as_millis() as u64);
        store.size_limit(max_entries.max(1));
        Self {
            store: Mutex::new(store),
        }
    }

    fn store(&self) -> Result<MutexGuard<'_, ExpiringSizedCache<String, Vec<u8>>>, CacheError> {
        self.store
            .lock()
            .map_err(|_| CacheError::Unavailable("cache lock poisoned".to_string()))
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.store().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Cache for TtlCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.store()?.get_borrowed(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        self.store()?
            .insert_ttl_evict(key.to_string(), value, Some(ttl.as_millis() as u64), true)
            .map(|_| ())
            .map_err(|e| CacheError::Unavailable(format!("cannot schedule expiry: {:?}", e)))
    }

    async fn delete(&self, keys: &[String]) -> Result<(), CacheError> {
        let mut store = self.store()?;
        for key in keys {
            store.remove(key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_delete() {
        let cache = TtlCache::new(16);
        cache
            .set("account:1", b"one".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.get("account:1").await.unwrap(), Some(b"one".to_vec()));
        assert_eq!(cache.get("account:2").await.unwrap(), None);

        cache
            .delete(&["account:1".to_string(), "account:2".to_string()])
            .await
            .unwrap();
        assert_eq!(cache.get("account:1").await.unwrap(), None);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss() {
        let cache = TtlCache::new(16);
        cache
            .set("short", b"v".to_vec(), Duration::from_millis(10))
            .await
            .unwrap();
        cache
            .set("long", b"w".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(cache.get("short").await.unwrap(), None);
        assert_eq!(cache.get("long").await.unwrap(), Some(b"w".to_vec()));
    }

    #[tokio::test]
    async fn test_full_cache_makes_room_from_expired_entries() {
        let cache = TtlCache::new(2);
        cache
            .set("old", b"1".to_vec(), Duration::from_millis(5))
            .await
            .unwrap();
        cache
            .set("live", b"2".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(20)).await;
        cache
            .set("new", b"3".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("live").await.unwrap(), Some(b"2".to_vec()));
        assert_eq!(cache.get("new").await.unwrap(), Some(b"3".to_vec()));
    }

    #[tokio::test]
    async fn test_full_cache_drops_entry_closest_to_expiry() {
        let cache = TtlCache::new(2);
        cache
            .set("list", b"1".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .set("account", b"2".to_vec(), Duration::from_secs(300))
            .await
            .unwrap();
        cache
            .set("account:2", b"3".to_vec(), Duration::from_secs(300))
            .await
            .unwrap();

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("list").await.unwrap(), None);
        assert_eq!(cache.get("account").await.unwrap(), Some(b"2".to_vec()));
    }

    #[tokio::test]
    async fn test_overwrite_resets_ttl() {
        let cache = TtlCache::new(4);
        cache
            .set("k", b"old".to_vec(), Duration::from_millis(10))
            .await
            .unwrap();
        cache
            .set("k", b"new".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(cache.get("k").await.unwrap(), Some(b"new".to_vec()));
        assert_eq!(cache.len(), 1);
    }
}
