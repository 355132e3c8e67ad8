//! 日产量（生产批次）实体

use chrono::NaiveDate;
use common::dates::DateRange;
use common::types::Pagination;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{DailyProductionId, ItemId};

/// 某部品某日的生产总数，质量记录的 OK + NG 必须等于该数量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProduction {
    pub id: DailyProductionId,
    pub item_id: ItemId,
    pub production_date: NaiveDate,
    #[serde(default)]
    pub total_quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDailyProduction {
    pub item_id: ItemId,
    pub production_date: NaiveDate,
    pub total_quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProductionUpdate {
    pub total_quantity: u64,
}

/// 日产量查询参数
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProductionQueryParams {
    pub item_id: Option<ItemId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: u32,
    pub size: u32,
}

impl DailyProductionQueryParams {
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

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.size)
    }

    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(item_id) = self.item_id {
            pairs.push(("itemId", item_id.to_string()));
        }
        if let Some(date) = self.start_date {
            pairs.push(("startDate", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(date) = self.end_date {
            pairs.push(("endDate", date.format("%Y-%m-%d").to_string()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("size", self.size.to_string()));
        pairs
    }
}
