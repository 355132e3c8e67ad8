//! 参考数据（部品、工序）仓储接口

use async_trait::async_trait;
use errors::AppResult;

use crate::domain::entities::{Item, ItemUpdate, NewItem, Process};
use crate::domain::value_objects::{ItemId, ProcessId};

#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn list_items(&self) -> AppResult<Vec<Item>>;

    async fn get_item(&self, id: ItemId) -> AppResult<Item>;

    async fn create_item(&self, item: &NewItem) -> AppResult<Item>;

    async fn update_item(&self, id: ItemId, update: &ItemUpdate) -> AppResult<Item>;

    async fn delete_item(&self, id: ItemId) -> AppResult<()>;
}

/// 工序为只读参考数据
#[async_trait]
pub trait ProcessRepository: Send + Sync {
    async fn list_processes(&self) -> AppResult<Vec<Process>>;

    async fn get_process(&self, id: ProcessId) -> AppResult<Process>;
}
