//! 领域层
//!
//! 包含实体、值对象和仓储接口（后端数据源）

pub mod entities;
pub mod repositories;
pub mod value_objects;

pub use entities::*;
pub use repositories::*;
pub use value_objects::*;
