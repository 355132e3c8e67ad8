//! 质量记录仓储接口

use async_trait::async_trait;
use common::types::PagedResult;
use errors::AppResult;

use crate::domain::entities::{NewQualityRecord, QualityRecord, QualityRecordCounts, RecordQueryParams};
use crate::domain::value_objects::QualityRecordId;

/// 质量记录数据源
#[async_trait]
pub trait QualityRecordSource: Send + Sync {
    /// 分页查询；后端返回裸数组时视为单页
    async fn fetch_records(&self, params: &RecordQueryParams) -> AppResult<PagedResult<QualityRecord>>;

    async fn fetch_record(&self, id: QualityRecordId) -> AppResult<QualityRecord>;

    /// 后端判定为需要评价的记录
    async fn fetch_evaluation_required(&self) -> AppResult<Vec<QualityRecord>>;
}

/// 质量记录写入
#[async_trait]
pub trait QualityRecordWriter: Send + Sync {
    async fn create_record(&self, record: &NewQualityRecord) -> AppResult<QualityRecord>;

    async fn update_record(
        &self,
        id: QualityRecordId,
        counts: &QualityRecordCounts,
    ) -> AppResult<QualityRecord>;

    async fn delete_record(&self, id: QualityRecordId) -> AppResult<()>;
}

/// 专家评价提交，文本原样转发
#[async_trait]
pub trait EvaluationSink: Send + Sync {
    async fn submit_evaluation(&self, id: QualityRecordId, text: &str) -> AppResult<QualityRecord>;
}
