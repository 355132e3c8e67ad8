//! 查询缓存
//!
//! - `MokaCachePort`: 进程内 `CachePort` 实现
//! - `QueryCache`: 按资源和查询参数组织键、TTL 与失效规则

mod moka_cache;
mod query_cache;

pub use moka_cache::MokaCachePort;
pub use query_cache::{QueryCache, QueryCacheConfig};
