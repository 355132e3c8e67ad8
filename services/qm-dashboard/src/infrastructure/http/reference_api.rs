//! 部品 `/items` 与工序 `/processes` 接口

use std::sync::Arc;

use async_trait::async_trait;
use common::types::Pagination;
use errors::AppResult;

use crate::domain::entities::{Item, ItemUpdate, NewItem, Process};
use crate::domain::repositories::{ItemRepository, ProcessRepository};
use crate::domain::value_objects::{ItemId, ProcessId};

use super::client::{ApiClient, require_body};
use super::envelope::{ListBody, normalize_list_body};

pub struct HttpItemRepository {
    client: Arc<ApiClient>,
}

impl HttpItemRepository {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ItemRepository for HttpItemRepository {
    async fn list_items(&self) -> AppResult<Vec<Item>> {
        let body: Option<ListBody<Item>> = self.client.get("/items", &[]).await?;
        Ok(normalize_list_body(body, &Pagination::default()).items)
    }

    async fn get_item(&self, id: ItemId) -> AppResult<Item> {
        let body = self.client.get(&format!("/items/{}", id), &[]).await?;
        require_body(body, "部品")
    }

    async fn create_item(&self, item: &NewItem) -> AppResult<Item> {
        let body = self.client.post("/items", item).await?;
        require_body(body, "部品")
    }

    async fn update_item(&self, id: ItemId, update: &ItemUpdate) -> AppResult<Item> {
        let body = self.client.put(&format!("/items/{}", id), update).await?;
        require_body(body, "部品")
    }

    async fn delete_item(&self, id: ItemId) -> AppResult<()> {
        self.client.delete(&format!("/items/{}", id)).await
    }
}

pub struct HttpProcessRepository {
    client: Arc<ApiClient>,
}

impl HttpProcessRepository {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProcessRepository for HttpProcessRepository {
    async fn list_processes(&self) -> AppResult<Vec<Process>> {
        let body: Option<ListBody<Process>> = self.client.get("/processes", &[]).await?;
        Ok(normalize_list_body(body, &Pagination::default()).items)
    }

    async fn get_process(&self, id: ProcessId) -> AppResult<Process> {
        let body = self.client.get(&format!("/processes/{}", id), &[]).await?;
        require_body(body, "工序")
    }
}
