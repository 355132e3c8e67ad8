//! 日产量接口 `/daily-productions`

use std::sync::Arc;

use async_trait::async_trait;
use common::types::PagedResult;
use errors::AppResult;

use crate::domain::entities::{
    DailyProduction, DailyProductionQueryParams, DailyProductionUpdate, NewDailyProduction,
};
use crate::domain::repositories::DailyProductionRepository;
use crate::domain::value_objects::DailyProductionId;

use super::client::{ApiClient, require_body};
use super::envelope::{ListBody, normalize_list_body};

pub struct HttpDailyProductionRepository {
    client: Arc<ApiClient>,
}

impl HttpDailyProductionRepository {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DailyProductionRepository for HttpDailyProductionRepository {
    async fn list_daily_productions(
        &self,
        params: &DailyProductionQueryParams,
    ) -> AppResult<PagedResult<DailyProduction>> {
        let body: Option<ListBody<DailyProduction>> = self
            .client
            .get("/daily-productions", &params.to_query_pairs())
            .await?;
        Ok(normalize_list_body(body, &params.pagination()))
    }

    async fn get_daily_production(&self, id: DailyProductionId) -> AppResult<DailyProduction> {
        let body = self
            .client
            .get(&format!("/daily-productions/{}", id), &[])
            .await?;
        require_body(body, "日产量")
    }

    async fn create_daily_production(
        &self,
        production: &NewDailyProduction,
    ) -> AppResult<DailyProduction> {
        let body = self.client.post("/daily-productions", production).await?;
        require_body(body, "日产量")
    }

    async fn update_daily_production(
        &self,
        id: DailyProductionId,
        update: &DailyProductionUpdate,
    ) -> AppResult<DailyProduction> {
        let body = self
            .client
            .put(&format!("/daily-productions/{}", id), update)
            .await?;
        require_body(body, "日产量")
    }

    async fn delete_daily_production(&self, id: DailyProductionId) -> AppResult<()> {
        self.client
            .delete(&format!("/daily-productions/{}", id))
            .await
    }
}
