//! 值对象模块

mod ids;
mod ng_rate;
mod threshold;

pub use ids::*;
pub use ng_rate::{NgRate, compute_ng_rate};
pub use threshold::{
    DEFAULT_THRESHOLD_PERCENT, IndustryThreshold, THRESHOLD_CODE_GROUP, THRESHOLD_CODE_KEY,
};
