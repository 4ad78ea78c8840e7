use async_trait::async_trait;
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use crate::models::CacheStats;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),

    #[error("L2 cache did not answer within {0:?}")]
    Timeout(Duration),
}

/// Shared L2 tier behind the in-process cache
#[async_trait]
pub trait RemoteCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set_ex(&self, key: &str, value: String, ttl_secs: u64) -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// Redis-backed L2 tier
pub struct RedisCache {
    conn: tokio::sync::Mutex<ConnectionManager>,
}

impl RedisCache {
    pub async fn connect(redis_url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let conn = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            conn: tokio::sync::Mutex::new(conn),
        })
    }
}

#[async_trait]
impl RemoteCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.lock().await;
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut *conn)
            .await?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: String, ttl_secs: u64) -> Result<(), CacheError> {
        let mut conn = self.conn.lock().await;
        redis::cmd("SETEX")
            .arg(key)
            .arg(ttl_secs)
            .arg(value)
            .query_async::<()>(&mut *conn)
            .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.lock().await;
        redis::cmd("DEL")
            .arg(key)
            .query_async::<()>(&mut *conn)
            .await?;
        Ok(())
    }
}

/// Multi-tier cache manager
///
/// L1 is an in-process moka cache; L2 is Redis, shared across instances.
/// Without a Redis URL (or when Redis is unreachable at startup) the
/// manager runs on L1 alone. Every L2 call is bounded by `remote_timeout`;
/// a read that runs out of time counts as a miss.
pub struct CacheManager {
    remote: Option<Arc<dyn RemoteCache>>,
    l1_cache: moka::future::Cache<String, Vec<u8>>,
    ttl_secs: u64,
    remote_timeout: Duration,
}

const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(2);

impl CacheManager {
    /// Create a cache manager backed by Redis
    pub async fn new(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let redis = RedisCache::connect(redis_url).await?;
        Ok(Self::with_remote(Arc::new(redis), l1_size, ttl_secs))
    }

    /// Create a cache manager over any L2 tier
    pub fn with_remote(remote: Arc<dyn RemoteCache>, l1_size: u64, ttl_secs: u64) -> Self {
        Self {
            remote: Some(remote),
            l1_cache: build_l1(l1_size, ttl_secs),
            ttl_secs,
            remote_timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }

    /// Create an in-memory only cache manager
    pub fn in_memory(l1_size: u64, ttl_secs: u64) -> Self {
        Self {
            remote: None,
            l1_cache: build_l1(l1_size, ttl_secs),
            ttl_secs,
            remote_timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }

    pub fn with_remote_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout = timeout;
        self
    }

    pub fn has_redis(&self) -> bool {
        self.remote.is_some()
    }

    /// Get a value from cache (L1 first, then L2)
    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        if let Some(bytes) = self.l1_cache.get(key).await {
            tracing::trace!("L1 cache hit: {}", key);
            return Ok(serde_json::from_slice(&bytes)?);
        }

        if let Some(remote) = &self.remote {
            match tokio::time::timeout(self.remote_timeout, remote.get(key)).await {
                Ok(Ok(Some(json))) => {
                    tracing::trace!("L2 cache hit: {}", key);

                    let bytes = json.as_bytes().to_vec();
                    self.l1_cache.insert(key.to_string(), bytes).await;

                    return Ok(serde_json::from_str(&json)?);
                }
                Ok(Ok(None)) => {}
                Ok(Err(e)) => return Err(e),
                Err(_) => {
                    tracing::warn!("L2 cache read of {} timed out after {:?}", key, self.remote_timeout);
                }
            }
        }

        tracing::trace!("Cache miss: {}", key);
        Err(CacheError::CacheMiss(key.to_string()))
    }

    /// Set a value in every configured tier
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let json = serde_json::to_string(value)?;

        let bytes = json.as_bytes().to_vec();
        self.l1_cache.insert(key.to_string(), bytes).await;

        if let Some(remote) = &self.remote {
            tokio::time::timeout(self.remote_timeout, remote.set_ex(key, json, self.ttl_secs))
                .await
                .map_err(|_| CacheError::Timeout(self.remote_timeout))??;
        }

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Delete a value from both cache tiers
    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.l1_cache.invalidate(key).await;
        if let Some(remote) = &self.remote {
            tokio::time::timeout(self.remote_timeout, remote.delete(key))
                .await
                .map_err(|_| CacheError::Timeout(self.remote_timeout))??;
        }
        Ok(())
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            l1_size: self.l1_cache.entry_count(),
            redis_enabled: self.remote.is_some(),
            ttl_secs: self.ttl_secs,
        }
    }
}

fn build_l1(l1_size: u64, ttl_secs: u64) -> moka::future::Cache<String, Vec<u8>> {
    moka::future::CacheBuilder::new(l1_size)
        .time_to_live(Duration::from_secs(ttl_secs))
        .build()
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Key of the active catalog snapshot
    pub fn active_catalog() -> String {
        "catalog:active".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_set_get_delete() {
        let cache = CacheManager::in_memory(100, 60);

        cache.set("key", &vec!["a".to_string()]).await.unwrap();
        let value: Vec<String> = cache.get("key").await.unwrap();
        assert_eq!(value, vec!["a"]);

        cache.delete("key").await.unwrap();
        assert!(matches!(cache.get::<Vec<String>>("key").await, Err(CacheError::CacheMiss(_))));
        assert!(!cache.has_redis());
    }

    #[tokio::test]
    #[ignore = "Requires Redis"]
    async fn test_redis_set_get() {
        let cache = CacheManager::new("redis://127.0.0.1:6379", 1000, 60)
            .await
            .expect("Failed to create cache");

        cache.set("test_key", &"test_value").await.unwrap();
        let result: String = cache.get("test_key").await.unwrap();
        assert_eq!(result, "test_value");

        cache.delete("test_key").await.unwrap();
    }

    struct StalledRemote;

    #[async_trait]
    impl RemoteCache for StalledRemote {
        async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            std::future::pending().await
        }

        async fn set_ex(&self, _key: &str, _value: String, _ttl_secs: u64) -> Result<(), CacheError> {
            std::future::pending().await
        }

        async fn delete(&self, _key: &str) -> Result<(), CacheError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_stalled_l2_degrades_to_l1() {
        let cache = CacheManager::with_remote(Arc::new(StalledRemote), 100, 60)
            .with_remote_timeout(Duration::from_millis(20));

        let missing = tokio::time::timeout(Duration::from_secs(1), cache.get::<String>("key"))
            .await
            .expect("L2 read should be bounded");
        assert!(matches!(missing, Err(CacheError::CacheMiss(_))));

        let stored = tokio::time::timeout(Duration::from_secs(1), cache.set("key", &"value"))
            .await
            .expect("L2 write should be bounded");
        assert!(matches!(stored, Err(CacheError::Timeout(_))));

        // L1 still took the value
        let value: String = cache.get("key").await.unwrap();
        assert_eq!(value, "value");
        assert!(cache.has_redis());
    }

    #[test]
    fn test_cache_key_builder() {
        assert_eq!(CacheKey::active_catalog(), "catalog:active");
    }
}
