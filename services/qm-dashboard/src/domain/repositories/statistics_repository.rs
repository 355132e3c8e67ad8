//! 汇总统计仓储接口

use async_trait::async_trait;
use common::dates::DateRange;
use errors::AppResult;

use crate::domain::entities::{ItemStatistic, ProcessStatistic};

#[async_trait]
pub trait StatisticsRepository: Send + Sync {
    async fn statistics_by_process(&self, range: &DateRange) -> AppResult<Vec<ProcessStatistic>>;

    async fn statistics_by_item(&self, range: &DateRange) -> AppResult<Vec<ItemStatistic>>;
}
