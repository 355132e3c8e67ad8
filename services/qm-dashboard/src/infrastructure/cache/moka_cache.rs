//! 基于 Moka 的进程内缓存
//!
//! 每个条目自带过期时间，读取时检查；Moka 的全局 TTL 只作为上限。

use async_trait::async_trait;
use errors::AppResult;
use moka::future::Cache as MokaCache;
use ports::CachePort;
use std::time::{Duration, Instant};

#[derive(Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

#[derive(Clone)]
pub struct MokaCachePort {
    inner: MokaCache<String, Entry>,
}

impl MokaCachePort {
    /// `max_ttl` 为所有条目的存活上限
    pub fn new(max_capacity: u64, max_ttl: Duration) -> Self {
        let inner = MokaCache::builder()
            .max_capacity(max_capacity)
            .time_to_live(max_ttl)
            .build();
        Self { inner }
    }

    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}

#[async_trait]
impl CachePort for MokaCachePort {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        match self.inner.get(key).await {
            Some(entry) if entry.is_expired() => {
                self.inner.invalidate(key).await;
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> AppResult<()> {
        let entry = Entry {
            value: value.to_string(),
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        };
        self.inner.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.inner.invalidate(key).await;
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> AppResult<()> {
        let keys: Vec<String> = self
            .inner
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.to_string())
            .collect();
        for key in keys {
            self.inner.invalidate(&key).await;
        }
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.get(key).await?.is_some())
    }
}
