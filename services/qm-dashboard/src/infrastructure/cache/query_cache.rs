//! 查询缓存
//!
//! 键按资源与序列化后的查询参数组织；写操作成功后按资源整体失效，不做局部修补。
//! 缓存故障只降级为直接请求后端。

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use common::dates::DateRange;
use errors::AppResult;
use ports::CachePort;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::domain::entities::{DailyProductionQueryParams, RecordQueryParams};
use crate::domain::value_objects::{DailyProductionId, ItemId, ProcessId, QualityRecordId};
use crate::infrastructure::observability::metrics;

const RECORDS_PREFIX: &str = "qm:quality_records:";
const RECORD_LIST_PREFIX: &str = "qm:quality_records:list:";
const EVALUATION_REQUIRED_KEY: &str = "qm:quality_records:evaluation_required";
const DAILY_PRODUCTIONS_PREFIX: &str = "qm:daily_productions:";
const ITEMS_PREFIX: &str = "qm:items:";
const STATISTICS_PREFIX: &str = "qm:statistics:";
const ALL_PREFIX: &str = "qm:";

/// 缓存新鲜期配置
#[derive(Debug, Clone)]
pub struct QueryCacheConfig {
    /// 质量记录、日产量、统计（秒）
    pub records_ttl_secs: u64,
    /// 部品、工序（秒）
    pub reference_ttl_secs: u64,
    /// 系统代码（秒）
    pub system_codes_ttl_secs: u64,
}

impl Default for QueryCacheConfig {
    fn default() -> Self {
        Self {
            records_ttl_secs: 120,     // 2 分钟
            reference_ttl_secs: 300,   // 5 分钟
            system_codes_ttl_secs: 600, // 10 分钟
        }
    }
}

impl From<&config::CacheConfig> for QueryCacheConfig {
    fn from(config: &config::CacheConfig) -> Self {
        Self {
            records_ttl_secs: config.records_ttl_secs,
            reference_ttl_secs: config.reference_ttl_secs,
            system_codes_ttl_secs: config.system_codes_ttl_secs,
        }
    }
}

pub struct QueryCache {
    cache: Arc<dyn CachePort>,
    config: QueryCacheConfig,
}

impl QueryCache {
    pub fn new(cache: Arc<dyn CachePort>) -> Self {
        Self {
            cache,
            config: QueryCacheConfig::default(),
        }
    }

    pub fn with_config(mut self, config: QueryCacheConfig) -> Self {
        self.config = config;
        self
    }

    pub fn records_ttl(&self) -> Duration {
        Duration::from_secs(self.config.records_ttl_secs)
    }

    pub fn reference_ttl(&self) -> Duration {
        Duration::from_secs(self.config.reference_ttl_secs)
    }

    pub fn system_codes_ttl(&self) -> Duration {
        Duration::from_secs(self.config.system_codes_ttl_secs)
    }

    // ============ 键 ============

    fn params_suffix<P: Serialize>(params: &P) -> String {
        serde_json::to_string(params).unwrap_or_default()
    }

    pub fn record_list_key(params: &RecordQueryParams) -> String {
        format!("{}{}", RECORD_LIST_PREFIX, Self::params_suffix(params))
    }

    pub fn record_key(id: QualityRecordId) -> String {
        format!("{}detail:{}", RECORDS_PREFIX, id)
    }

    pub fn evaluation_required_key() -> &'static str {
        EVALUATION_REQUIRED_KEY
    }

    pub fn daily_production_list_key(params: &DailyProductionQueryParams) -> String {
        format!("{}list:{}", DAILY_PRODUCTIONS_PREFIX, Self::params_suffix(params))
    }

    pub fn daily_production_key(id: DailyProductionId) -> String {
        format!("{}detail:{}", DAILY_PRODUCTIONS_PREFIX, id)
    }

    pub fn items_key() -> String {
        format!("{}list", ITEMS_PREFIX)
    }

    pub fn item_key(id: ItemId) -> String {
        format!("{}detail:{}", ITEMS_PREFIX, id)
    }

    pub fn processes_key() -> &'static str {
        "qm:processes:list"
    }

    pub fn process_key(id: ProcessId) -> String {
        format!("qm:processes:detail:{}", id)
    }

    pub fn system_codes_key(code_group: Option<&str>) -> String {
        format!("qm:system_codes:{}", code_group.unwrap_or("*"))
    }

    pub fn statistics_key(kind: &str, range: &DateRange) -> String {
        format!("{}{}:{}", STATISTICS_PREFIX, kind, Self::params_suffix(range))
    }

    // ============ 读取 ============

    /// 命中则返回缓存值，否则调用 `fetch` 并写入缓存
    pub async fn get_or_fetch<T, F, Fut>(
        &self,
        resource: &str,
        key: &str,
        ttl: Duration,
        fetch: F,
    ) -> AppResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        match self.cache.get(key).await {
            Ok(Some(json)) => match serde_json::from_str::<T>(&json) {
                Ok(value) => {
                    debug!(key = %key, "Cache hit");
                    metrics::record_cache_hit(resource);
                    return Ok(value);
                }
                Err(e) => warn!(key = %key, error = %e, "Discarding undecodable cache entry"),
            },
            Ok(None) => debug!(key = %key, "Cache miss"),
            Err(e) => warn!(key = %key, error = %e, "Cache read failed"),
        }
        metrics::record_cache_miss(resource);

        let value = fetch().await?;

        match serde_json::to_string(&value) {
            Ok(json) => {
                if let Err(e) = self.cache.set(key, &json, Some(ttl)).await {
                    warn!(key = %key, error = %e, "Cache write failed");
                }
            }
            Err(e) => warn!(key = %key, error = %e, "Failed to serialize value for cache"),
        }
        Ok(value)
    }

    // ============ 失效 ============

    async fn delete_prefix(&self, scope: &str, prefix: &str) {
        debug!(prefix = %prefix, "Invalidating cache");
        metrics::record_cache_invalidation(scope);
        if let Err(e) = self.cache.delete_prefix(prefix).await {
            warn!(prefix = %prefix, error = %e, "Cache invalidation failed");
        }
    }

    async fn delete_key(&self, scope: &str, key: &str) {
        debug!(key = %key, "Invalidating cache");
        metrics::record_cache_invalidation(scope);
        if let Err(e) = self.cache.delete(key).await {
            warn!(key = %key, error = %e, "Cache invalidation failed");
        }
    }

    /// 所有质量记录列表（任意查询参数）
    pub async fn invalidate_record_lists(&self) {
        self.delete_prefix("record_lists", RECORD_LIST_PREFIX).await;
    }

    pub async fn invalidate_record(&self, id: QualityRecordId) {
        self.delete_key("record", &Self::record_key(id)).await;
    }

    pub async fn invalidate_evaluation_required(&self) {
        self.delete_key("evaluation_required", EVALUATION_REQUIRED_KEY)
            .await;
    }

    /// 质量记录相关的全部缓存（列表、单条、评价需求）
    pub async fn invalidate_records(&self) {
        self.delete_prefix("records", RECORDS_PREFIX).await;
    }

    pub async fn invalidate_statistics(&self) {
        self.delete_prefix("statistics", STATISTICS_PREFIX).await;
    }

    pub async fn invalidate_daily_productions(&self) {
        self.delete_prefix("daily_productions", DAILY_PRODUCTIONS_PREFIX)
            .await;
    }

    pub async fn invalidate_items(&self) {
        self.delete_prefix("items", ITEMS_PREFIX).await;
    }

    /// 登出时清空
    pub async fn clear(&self) {
        self.delete_prefix("all", ALL_PREFIX).await;
    }
}
