//! 查询定义

mod quality_record_queries;
mod reference_queries;

pub use quality_record_queries::*;
pub use reference_queries::*;
