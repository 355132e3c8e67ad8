//! 汇总统计（按工序 / 按部品）
//!
//! NG 率总是由合计数量在本地计算，不使用后端返回的比率字段。

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{ItemId, NgRate, ProcessId};

/// 汇总行的公共访问接口，统计视图据此排序与标记
pub trait AggregateStatistic {
    fn code(&self) -> &str;
    fn name(&self) -> &str;
    fn total_quantity(&self) -> u64;
    fn total_ng_quantity(&self) -> u64;

    fn ng_rate(&self) -> NgRate {
        NgRate::from_totals(self.total_quantity(), self.total_ng_quantity())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessStatistic {
    pub process_id: ProcessId,
    #[serde(default)]
    pub process_code: String,
    #[serde(default)]
    pub process_name: String,
    #[serde(default)]
    pub total_quantity: u64,
    #[serde(default)]
    pub total_ng_quantity: u64,
}

impl AggregateStatistic for ProcessStatistic {
    fn code(&self) -> &str {
        &self.process_code
    }

    fn name(&self) -> &str {
        &self.process_name
    }

    fn total_quantity(&self) -> u64 {
        self.total_quantity
    }

    fn total_ng_quantity(&self) -> u64 {
        self.total_ng_quantity
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStatistic {
    pub item_id: ItemId,
    #[serde(default)]
    pub item_code: String,
    #[serde(default)]
    pub item_name: String,
    #[serde(default)]
    pub total_quantity: u64,
    #[serde(default)]
    pub total_ng_quantity: u64,
}

impl AggregateStatistic for ItemStatistic {
    fn code(&self) -> &str {
        &self.item_code
    }

    fn name(&self) -> &str {
        &self.item_name
    }

    fn total_quantity(&self) -> u64 {
        self.total_quantity
    }

    fn total_ng_quantity(&self) -> u64 {
        self.total_ng_quantity
    }
}
