//! 实体模块

mod daily_production;
mod item;
mod process;
mod quality_record;
mod statistic;
mod system_code;
mod user;

pub use daily_production::*;
pub use item::*;
pub use process::*;
pub use quality_record::*;
pub use statistic::*;
pub use system_code::*;
pub use user::*;
