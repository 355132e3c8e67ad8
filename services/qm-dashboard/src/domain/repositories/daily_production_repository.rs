//! 日产量仓储接口

use async_trait::async_trait;
use common::types::PagedResult;
use errors::AppResult;

use crate::domain::entities::{
    DailyProduction, DailyProductionQueryParams, DailyProductionUpdate, NewDailyProduction,
};
use crate::domain::value_objects::DailyProductionId;

#[async_trait]
pub trait DailyProductionRepository: Send + Sync {
    async fn list_daily_productions(
        &self,
        params: &DailyProductionQueryParams,
    ) -> AppResult<PagedResult<DailyProduction>>;

    async fn get_daily_production(&self, id: DailyProductionId) -> AppResult<DailyProduction>;

    async fn create_daily_production(
        &self,
        production: &NewDailyProduction,
    ) -> AppResult<DailyProduction>;

    async fn update_daily_production(
        &self,
        id: DailyProductionId,
        update: &DailyProductionUpdate,
    ) -> AppResult<DailyProduction>;

    async fn delete_daily_production(&self, id: DailyProductionId) -> AppResult<()>;
}
