//! 系统代码接口 `/system-codes`

use std::sync::Arc;

use async_trait::async_trait;
use common::types::Pagination;
use errors::AppResult;

use crate::domain::entities::SystemCode;
use crate::domain::repositories::ThresholdSource;

use super::client::ApiClient;
use super::envelope::{ListBody, normalize_list_body};

pub struct HttpSystemCodeRepository {
    client: Arc<ApiClient>,
}

impl HttpSystemCodeRepository {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ThresholdSource for HttpSystemCodeRepository {
    async fn fetch_system_codes(&self, code_group: Option<&str>) -> AppResult<Vec<SystemCode>> {
        let query: Vec<(&str, String)> = code_group
            .map(|group| vec![("codeGroup", group.to_string())])
            .unwrap_or_default();
        let body: Option<ListBody<SystemCode>> = self.client.get("/system-codes", &query).await?;
        Ok(normalize_list_body(body, &Pagination::default()).items)
    }
}
