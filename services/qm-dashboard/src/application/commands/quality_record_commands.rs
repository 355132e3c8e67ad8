//! 质量记录命令

use errors::{AppResult, FieldErrors};

use crate::domain::entities::{DailyProduction, NewQualityRecord, QualityRecordCounts};
use crate::domain::value_objects::{DailyProductionId, ProcessId, QualityRecordId};

/// OK + NG 必须等于批次总产量，不一致时两个数量字段都提示
pub fn check_batch_total(ok_quantity: u64, ng_quantity: u64, batch: &DailyProduction) -> AppResult<()> {
    let total = ok_quantity.saturating_add(ng_quantity);
    if total == batch.total_quantity {
        return Ok(());
    }
    let message = format!(
        "总数量（{}）与日产量的总生产量（{}）不一致",
        total, batch.total_quantity
    );
    let mut errors = FieldErrors::new();
    errors.add("okQuantity", message.clone());
    errors.add("ngQuantity", message);
    errors.into_result()
}

/// 新建质量记录命令
#[derive(Debug, Clone, PartialEq)]
pub struct CreateQualityRecordCommand {
    pub daily_production_id: DailyProductionId,
    pub process_id: ProcessId,
    pub ok_quantity: u64,
    pub ng_quantity: u64,
}

impl CreateQualityRecordCommand {
    pub fn validate(&self, batch: &DailyProduction) -> AppResult<()> {
        check_batch_total(self.ok_quantity, self.ng_quantity, batch)
    }

    pub fn to_request(&self) -> NewQualityRecord {
        NewQualityRecord {
            daily_production_id: self.daily_production_id,
            process_id: self.process_id,
            ok_quantity: self.ok_quantity,
            ng_quantity: self.ng_quantity,
        }
    }
}

/// 修改质量记录命令：只修改数量，批次与工序保持不变
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateQualityRecordCommand {
    pub record_id: QualityRecordId,
    pub ok_quantity: u64,
    pub ng_quantity: u64,
}

impl UpdateQualityRecordCommand {
    pub fn validate(&self, batch: &DailyProduction) -> AppResult<()> {
        check_batch_total(self.ok_quantity, self.ng_quantity, batch)
    }

    pub fn to_request(&self) -> QualityRecordCounts {
        QualityRecordCounts {
            ok_quantity: self.ok_quantity,
            ng_quantity: self.ng_quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteQualityRecordCommand {
    pub record_id: QualityRecordId,
}

/// 专家评价命令
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluateQualityRecordCommand {
    pub record_id: QualityRecordId,
    pub evaluation: String,
}

impl EvaluateQualityRecordCommand {
    pub fn new(record_id: QualityRecordId, evaluation: impl Into<String>) -> Self {
        Self {
            record_id,
            evaluation: evaluation.into(),
        }
    }

    /// 返回去除首尾空白后的评价内容
    pub fn validate(&self) -> AppResult<&str> {
        let text = self.evaluation.trim();
        if text.is_empty() {
            return Err(errors::AppError::field("evaluation", "请输入评价内容"));
        }
        Ok(text)
    }
}
