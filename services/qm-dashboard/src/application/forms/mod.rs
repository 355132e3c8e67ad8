//! 表单与对话框状态
//!
//! 保存用户输入的原始文本，提交时在本地校验后交给处理器。
//! 本地校验错误按字段保存，远程错误保存为单条 `submit` 消息；失败时输入保持不变。

mod daily_production_form;
mod evaluation_dialog;
mod quality_record_form;

pub use daily_production_form::DailyProductionForm;
pub use evaluation_dialog::EvaluationDialog;
pub use quality_record_form::{QualityRecordForm, RecordFormPreview};

use std::str::FromStr;

use errors::{AppError, FieldErrors};

/// 远程错误使用的字段名
pub const SUBMIT_FIELD: &str = "submit";

/// 必填 ID
fn parse_required<T: FromStr>(raw: &str, field: &str, label: &str, errors: &mut FieldErrors) -> Option<T> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.add(field, format!("请选择{}", label));
        return None;
    }
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.add(field, format!("{}无效", label));
            None
        }
    }
}

/// 必填且为非负整数的数量
fn parse_count(raw: &str, field: &str, label: &str, errors: &mut FieldErrors) -> Option<u64> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.add(field, format!("请输入{}", label));
        return None;
    }
    match raw.parse::<u64>() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.add(field, format!("{}必须是 0 以上的整数", label));
            None
        }
    }
}

/// 把处理器返回的错误拆成字段错误或单条提交错误
fn into_form_errors(error: AppError) -> FieldErrors {
    match error {
        AppError::InvalidFields(fields) => fields,
        other => {
            let mut errors = FieldErrors::new();
            errors.add(SUBMIT_FIELD, other.user_message());
            errors
        }
    }
}
