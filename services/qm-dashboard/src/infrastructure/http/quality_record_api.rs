//! 质量记录接口 `/quality-records`

use std::sync::Arc;

use async_trait::async_trait;
use common::types::{PagedResult, Pagination};
use errors::AppResult;

use crate::domain::entities::{
    EvaluationRequest, NewQualityRecord, QualityRecord, QualityRecordCounts, RecordQueryParams,
};
use crate::domain::repositories::{EvaluationSink, QualityRecordSource, QualityRecordWriter};
use crate::domain::value_objects::QualityRecordId;

use super::client::{ApiClient, require_body};
use super::envelope::{ListBody, normalize_list_body};

pub struct HttpQualityRecordRepository {
    client: Arc<ApiClient>,
}

impl HttpQualityRecordRepository {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QualityRecordSource for HttpQualityRecordRepository {
    async fn fetch_records(&self, params: &RecordQueryParams) -> AppResult<PagedResult<QualityRecord>> {
        let body: Option<ListBody<QualityRecord>> = self
            .client
            .get("/quality-records", &params.to_query_pairs())
            .await?;
        Ok(normalize_list_body(body, &params.pagination()))
    }

    async fn fetch_record(&self, id: QualityRecordId) -> AppResult<QualityRecord> {
        let body = self
            .client
            .get(&format!("/quality-records/{}", id), &[])
            .await?;
        require_body(body, "质量记录")
    }

    async fn fetch_evaluation_required(&self) -> AppResult<Vec<QualityRecord>> {
        let body: Option<ListBody<QualityRecord>> = self
            .client
            .get("/quality-records/evaluation-required", &[])
            .await?;
        Ok(normalize_list_body(body, &Pagination::default()).items)
    }
}

#[async_trait]
impl QualityRecordWriter for HttpQualityRecordRepository {
    async fn create_record(&self, record: &NewQualityRecord) -> AppResult<QualityRecord> {
        let body = self.client.post("/quality-records", record).await?;
        require_body(body, "质量记录")
    }

    async fn update_record(
        &self,
        id: QualityRecordId,
        counts: &QualityRecordCounts,
    ) -> AppResult<QualityRecord> {
        let body = self
            .client
            .put(&format!("/quality-records/{}", id), counts)
            .await?;
        require_body(body, "质量记录")
    }

    async fn delete_record(&self, id: QualityRecordId) -> AppResult<()> {
        self.client
            .delete(&format!("/quality-records/{}", id))
            .await
    }
}

#[async_trait]
impl EvaluationSink for HttpQualityRecordRepository {
    async fn submit_evaluation(&self, id: QualityRecordId, text: &str) -> AppResult<QualityRecord> {
        let request = EvaluationRequest {
            expert_evaluation: text.to_string(),
        };
        let body = self
            .client
            .put(&format!("/quality-records/{}/evaluate", id), &request)
            .await?;
        require_body(body, "质量记录")
    }
}
