//! 仓储接口模块
//!
//! 后端 REST 服务拥有全部业务数据，这里只定义读取与提交的边界。

mod auth_repository;
mod daily_production_repository;
mod quality_record_repository;
mod reference_repository;
mod statistics_repository;
mod system_code_repository;

pub use auth_repository::AuthRepository;
pub use daily_production_repository::DailyProductionRepository;
pub use quality_record_repository::{EvaluationSink, QualityRecordSource, QualityRecordWriter};
pub use reference_repository::{ItemRepository, ProcessRepository};
pub use statistics_repository::StatisticsRepository;
pub use system_code_repository::ThresholdSource;
