//! qm-dashboard - 质量看板：NG 率计算、评价需求展示、列表整形与数据录入

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
