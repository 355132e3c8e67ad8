//! 基础设施层：HTTP 适配器、查询缓存与指标

pub mod cache;
pub mod http;
pub mod observability;
