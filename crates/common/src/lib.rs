//! common - 通用类型库

pub mod dates;
pub mod types;

pub use dates::*;
pub use types::*;
