//! 命令定义

mod auth_commands;
mod daily_production_commands;
mod item_commands;
mod quality_record_commands;

pub use auth_commands::*;
pub use daily_production_commands::*;
pub use item_commands::*;
pub use quality_record_commands::*;
