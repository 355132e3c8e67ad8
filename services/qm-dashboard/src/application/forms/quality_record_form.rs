//! 质量记录录入 / 修改表单

use errors::FieldErrors;

use crate::application::commands::{CreateQualityRecordCommand, UpdateQualityRecordCommand};
use crate::application::handler::ServiceHandler;
use crate::domain::entities::{DailyProduction, QualityRecord};
use crate::domain::value_objects::{
    DailyProductionId, IndustryThreshold, NgRate, ProcessId, QualityRecordId,
};

use super::{into_form_errors, parse_count, parse_required};

/// 输入过程中的实时预览
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordFormPreview {
    pub total: u64,
    pub ng_rate: NgRate,
    pub exceeds_threshold: bool,
    /// 已知批次总产量时，合计是否一致
    pub matches_batch: Option<bool>,
}

/// 新建时可选择批次与工序；修改时只改数量
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QualityRecordForm {
    editing: Option<QualityRecordId>,
    pub daily_production_id: String,
    pub process_id: String,
    pub ok_quantity: String,
    pub ng_quantity: String,
    errors: FieldErrors,
}

impl QualityRecordForm {
    pub fn for_create() -> Self {
        Self::default()
    }

    pub fn for_edit(record: &QualityRecord) -> Self {
        Self {
            editing: Some(record.id),
            daily_production_id: record.daily_production_id.to_string(),
            process_id: record.process_id.to_string(),
            ok_quantity: record.ok_quantity.to_string(),
            ng_quantity: record.ng_quantity.to_string(),
            errors: FieldErrors::new(),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// 数量可解析时给出合计与 NG 率
    pub fn preview(
        &self,
        batch: Option<&DailyProduction>,
        threshold: IndustryThreshold,
    ) -> Option<RecordFormPreview> {
        let ok = self.ok_quantity.trim().parse::<u64>().ok()?;
        let ng = self.ng_quantity.trim().parse::<u64>().ok()?;
        let total = ok.saturating_add(ng);
        let ng_rate = NgRate::from_counts(ok, ng);
        Some(RecordFormPreview {
            total,
            ng_rate,
            exceeds_threshold: threshold.is_exceeded_by(ng_rate),
            matches_batch: batch.map(|b| b.total_quantity == total),
        })
    }

    fn parse_counts(&self, errors: &mut FieldErrors) -> Option<(u64, u64)> {
        let ok = parse_count(&self.ok_quantity, "okQuantity", "OK 数量", errors);
        let ng = parse_count(&self.ng_quantity, "ngQuantity", "NG 数量", errors);
        Some((ok?, ng?))
    }

    pub fn to_create_command(&self) -> Result<CreateQualityRecordCommand, FieldErrors> {
        let mut errors = FieldErrors::new();
        let daily_production_id: Option<DailyProductionId> = parse_required(
            &self.daily_production_id,
            "dailyProductionId",
            "日产量批次",
            &mut errors,
        );
        let process_id: Option<ProcessId> =
            parse_required(&self.process_id, "processId", "工序", &mut errors);
        let counts = self.parse_counts(&mut errors);

        match (daily_production_id, process_id, counts) {
            (Some(daily_production_id), Some(process_id), Some((ok_quantity, ng_quantity)))
                if errors.is_empty() =>
            {
                Ok(CreateQualityRecordCommand {
                    daily_production_id,
                    process_id,
                    ok_quantity,
                    ng_quantity,
                })
            }
            _ => Err(errors),
        }
    }

    pub fn to_update_command(&self, record_id: QualityRecordId) -> Result<UpdateQualityRecordCommand, FieldErrors> {
        let mut errors = FieldErrors::new();
        match self.parse_counts(&mut errors) {
            Some((ok_quantity, ng_quantity)) if errors.is_empty() => Ok(UpdateQualityRecordCommand {
                record_id,
                ok_quantity,
                ng_quantity,
            }),
            _ => Err(errors),
        }
    }

    /// 提交；成功时新建表单清空，修改表单保留最新值
    pub async fn submit(&mut self, handler: &ServiceHandler) -> Option<QualityRecord> {
        self.errors = FieldErrors::new();
        let result = match self.editing {
            Some(record_id) => match self.to_update_command(record_id) {
                Ok(cmd) => handler.update_record(cmd).await,
                Err(errors) => {
                    self.errors = errors;
                    return None;
                }
            },
            None => match self.to_create_command() {
                Ok(cmd) => handler.create_record(cmd).await,
                Err(errors) => {
                    self.errors = errors;
                    return None;
                }
            },
        };

        match result {
            Ok(record) => {
                if self.is_editing() {
                    *self = Self::for_edit(&record);
                } else {
                    self.reset();
                }
                Some(record)
            }
            Err(e) => {
                self.errors = into_form_errors(e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ItemId;
    use chrono::NaiveDate;

    fn filled(ok: &str, ng: &str) -> QualityRecordForm {
        QualityRecordForm {
            daily_production_id: "5".into(),
            process_id: "2".into(),
            ok_quantity: ok.into(),
            ng_quantity: ng.into(),
            ..QualityRecordForm::for_create()
        }
    }

    #[test]
    fn test_create_command_from_raw_strings() {
        let cmd = filled("990", " 10 ").to_create_command().unwrap();
        assert_eq!(cmd.daily_production_id, DailyProductionId(5));
        assert_eq!(cmd.ng_quantity, 10);
    }

    #[test]
    fn test_missing_and_invalid_fields() {
        let form = QualityRecordForm {
            ok_quantity: "1.5".into(),
            ..QualityRecordForm::for_create()
        };
        let errors = form.to_create_command().unwrap_err();
        assert!(errors.contains("dailyProductionId"));
        assert!(errors.contains("processId"));
        assert!(errors.contains("okQuantity"));
        assert!(errors.contains("ngQuantity"));
    }

    #[test]
    fn test_preview() {
        let batch = DailyProduction {
            id: DailyProductionId(5),
            item_id: ItemId(1),
            production_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            total_quantity: 1000,
        };
        let preview = filled("990", "10")
            .preview(Some(&batch), IndustryThreshold::default())
            .unwrap();
        assert_eq!(preview.total, 1000);
        assert_eq!(preview.ng_rate.to_string(), "1.00");
        assert!(preview.exceeds_threshold);
        assert_eq!(preview.matches_batch, Some(true));

        assert!(filled("abc", "1").preview(None, IndustryThreshold::default()).is_none());
    }

    #[test]
    fn test_edit_form_keeps_linkage() {
        let record = QualityRecord {
            id: QualityRecordId(9),
            daily_production_id: DailyProductionId(5),
            production_date: None,
            item_id: None,
            process_id: ProcessId(2),
            ok_quantity: 10,
            ng_quantity: 0,
            evaluation_required: false,
            expert_evaluation: None,
        };
        let mut form = QualityRecordForm::for_edit(&record);
        assert!(form.is_editing());
        form.ng_quantity = "x".into();
        let errors = form.to_update_command(record.id).unwrap_err();
        assert_eq!(errors.len(), 1);
        form.ng_quantity = "2".into();
        let cmd = form.to_update_command(record.id).unwrap();
        assert_eq!((cmd.ok_quantity, cmd.ng_quantity), (10, 2));
    }
}
