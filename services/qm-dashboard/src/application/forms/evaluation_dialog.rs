//! 专家评价对话框

use crate::application::commands::EvaluateQualityRecordCommand;
use crate::application::handler::ServiceHandler;
use crate::domain::entities::QualityRecord;
use crate::domain::value_objects::QualityRecordId;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationDialog {
    record_id: Option<QualityRecordId>,
    text: String,
    field_error: Option<String>,
    submit_error: Option<String>,
}

impl EvaluationDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 打开对话框，已有评价时作为初始内容
    pub fn open(&mut self, record: &QualityRecord) {
        self.record_id = Some(record.id);
        self.text = record.expert_evaluation.clone().unwrap_or_default();
        self.field_error = None;
        self.submit_error = None;
    }

    pub fn is_open(&self) -> bool {
        self.record_id.is_some()
    }

    pub fn record_id(&self) -> Option<QualityRecordId> {
        self.record_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.field_error = None;
    }

    pub fn field_error(&self) -> Option<&str> {
        self.field_error.as_deref()
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    /// 提交评价；成功时关闭并返回更新后的记录，失败时保持打开且内容不变
    pub async fn submit(&mut self, handler: &ServiceHandler) -> Option<QualityRecord> {
        let record_id = self.record_id?;
        self.field_error = None;
        self.submit_error = None;

        let cmd = EvaluateQualityRecordCommand::new(record_id, self.text.clone());
        match handler.evaluate(cmd).await {
            Ok(record) => {
                self.cancel();
                Some(record)
            }
            Err(e) => {
                match e.field_errors().and_then(|f| f.get("evaluation")) {
                    Some(message) => self.field_error = Some(message.to_string()),
                    None => self.submit_error = Some(e.user_message()),
                }
                None
            }
        }
    }
}
