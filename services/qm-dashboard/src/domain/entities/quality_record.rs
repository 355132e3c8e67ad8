//! 质量记录实体

use chrono::NaiveDate;
use common::dates::{DateRange, YearMonth};
use common::types::Pagination;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{DailyProductionId, ItemId, NgRate, ProcessId, QualityRecordId};

/// 质量记录：某生产批次在某工序的 OK/NG 检验数量
///
/// `evaluation_required` 由后端计算，客户端只读不重算。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityRecord {
    pub id: QualityRecordId,
    pub daily_production_id: DailyProductionId,
    #[serde(default)]
    pub production_date: Option<NaiveDate>,
    #[serde(default)]
    pub item_id: Option<ItemId>,
    pub process_id: ProcessId,
    #[serde(default)]
    pub ok_quantity: u64,
    #[serde(default)]
    pub ng_quantity: u64,
    #[serde(default)]
    pub evaluation_required: bool,
    #[serde(default)]
    pub expert_evaluation: Option<String>,
}

impl QualityRecord {
    pub fn ng_rate(&self) -> NgRate {
        NgRate::from_counts(self.ok_quantity, self.ng_quantity)
    }

    pub fn inspected_quantity(&self) -> u64 {
        self.ok_quantity.saturating_add(self.ng_quantity)
    }

    /// 已有专家评价（评价只能提交一次）
    pub fn is_evaluated(&self) -> bool {
        self.expert_evaluation
            .as_deref()
            .is_some_and(|e| !e.trim().is_empty())
    }
}

/// 新建质量记录请求体
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQualityRecord {
    pub daily_production_id: DailyProductionId,
    pub process_id: ProcessId,
    pub ok_quantity: u64,
    pub ng_quantity: u64,
}

/// 修改数量请求体（批次与工序不可修改）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityRecordCounts {
    pub ok_quantity: u64,
    pub ng_quantity: u64,
}

/// 专家评价请求体
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    pub expert_evaluation: String,
}

/// 质量记录查询参数（发往后端）
///
/// 同时作为缓存键的一部分，字段顺序固定以保证序列化稳定。
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordQueryParams {
    pub item_id: Option<ItemId>,
    pub production_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub page: u32,
    pub size: u32,
}

impl RecordQueryParams {
    pub fn new(pagination: Pagination) -> Self {
        Self {
            page: pagination.page_index,
            size: pagination.page_size,
            ..Default::default()
        }
    }

    pub fn with_item(mut self, item_id: Option<ItemId>) -> Self {
        self.item_id = item_id;
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.start_date = range.start;
        self.end_date = range.end;
        self
    }

    pub fn with_month(mut self, year_month: Option<YearMonth>) -> Self {
        self.year = year_month.map(|ym| ym.year);
        self.month = year_month.map(|ym| ym.month);
        self
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.size)
    }

    /// 转为 URL 查询参数，省略空值，日期格式 `yyyy-MM-dd`
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(item_id) = self.item_id {
            pairs.push(("itemId", item_id.to_string()));
        }
        if let Some(date) = self.production_date {
            pairs.push(("productionDate", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(date) = self.start_date {
            pairs.push(("startDate", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(date) = self.end_date {
            pairs.push(("endDate", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(year) = self.year {
            pairs.push(("year", year.to_string()));
        }
        if let Some(month) = self.month {
            pairs.push(("month", month.to_string()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("size", self.size.to_string()));
        pairs
    }
}
