//! 后端 REST 适配器
//!
//! 所有响应都是 `{ "body": ..., "msg": ... }` 信封；列表可能是裸数组、分页对象或 null，
//! 在这里统一为 `PagedResult`。

mod auth_api;
mod client;
mod daily_production_api;
mod envelope;
mod error;
mod quality_record_api;
mod reference_api;
mod statistics_api;
mod system_code_api;

pub use auth_api::HttpAuthRepository;
pub use client::{ApiClient, require_body};
pub use daily_production_api::HttpDailyProductionRepository;
pub use envelope::{ApiEnvelope, ListBody, SpringPage, normalize_list_body};
pub use error::{map_http_error, map_transport_error};
pub use quality_record_api::HttpQualityRecordRepository;
pub use reference_api::{HttpItemRepository, HttpProcessRepository};
pub use statistics_api::HttpStatisticsRepository;
pub use system_code_api::HttpSystemCodeRepository;
