//! 系统代码 / 阈值来源

use async_trait::async_trait;
use errors::AppResult;

use crate::domain::entities::SystemCode;
use crate::domain::value_objects::{IndustryThreshold, THRESHOLD_CODE_GROUP};

#[async_trait]
pub trait ThresholdSource: Send + Sync {
    /// 按代码组查询系统代码，`None` 表示全部
    async fn fetch_system_codes(&self, code_group: Option<&str>) -> AppResult<Vec<SystemCode>>;

    /// 行业平均 NG 率阈值，缺失时为默认值
    async fn fetch_threshold(&self) -> AppResult<IndustryThreshold> {
        let codes = self.fetch_system_codes(Some(THRESHOLD_CODE_GROUP)).await?;
        Ok(IndustryThreshold::from_system_codes(&codes))
    }
}
