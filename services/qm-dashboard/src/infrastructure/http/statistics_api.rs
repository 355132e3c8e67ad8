//! 汇总统计接口 `/quality-records/statistics/*`

use std::sync::Arc;

use async_trait::async_trait;
use common::dates::DateRange;
use common::types::Pagination;
use errors::AppResult;

use crate::domain::entities::{ItemStatistic, ProcessStatistic};
use crate::domain::repositories::StatisticsRepository;

use super::client::ApiClient;
use super::envelope::{ListBody, normalize_list_body};

pub struct HttpStatisticsRepository {
    client: Arc<ApiClient>,
}

impl HttpStatisticsRepository {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

fn range_query(range: &DateRange) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    if let Some(start) = range.start {
        pairs.push(("startDate", start.format("%Y-%m-%d").to_string()));
    }
    if let Some(end) = range.end {
        pairs.push(("endDate", end.format("%Y-%m-%d").to_string()));
    }
    pairs
}

#[async_trait]
impl StatisticsRepository for HttpStatisticsRepository {
    async fn statistics_by_process(&self, range: &DateRange) -> AppResult<Vec<ProcessStatistic>> {
        let body: Option<ListBody<ProcessStatistic>> = self
            .client
            .get("/quality-records/statistics/by-process", &range_query(range))
            .await?;
        Ok(normalize_list_body(body, &Pagination::default()).items)
    }

    async fn statistics_by_item(&self, range: &DateRange) -> AppResult<Vec<ItemStatistic>> {
        let body: Option<ListBody<ItemStatistic>> = self
            .client
            .get("/quality-records/statistics/by-item", &range_query(range))
            .await?;
        Ok(normalize_list_body(body, &Pagination::default()).items)
    }
}
