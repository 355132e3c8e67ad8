//! 日产量录入 / 修改表单

use chrono::NaiveDate;
use errors::FieldErrors;

use crate::application::commands::{CreateDailyProductionCommand, UpdateDailyProductionCommand};
use crate::application::handler::ServiceHandler;
use crate::domain::entities::DailyProduction;
use crate::domain::value_objects::{DailyProductionId, ItemId};

use super::{into_form_errors, parse_count, parse_required};

/// 修改时部品与日期不可变
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyProductionForm {
    editing: Option<DailyProductionId>,
    pub item_id: String,
    /// `yyyy-MM-dd`
    pub production_date: String,
    pub total_quantity: String,
    errors: FieldErrors,
}

impl DailyProductionForm {
    pub fn for_create() -> Self {
        Self::default()
    }

    pub fn for_edit(production: &DailyProduction) -> Self {
        Self {
            editing: Some(production.id),
            item_id: production.item_id.to_string(),
            production_date: production.production_date.format("%Y-%m-%d").to_string(),
            total_quantity: production.total_quantity.to_string(),
            errors: FieldErrors::new(),
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn to_create_command(&self) -> Result<CreateDailyProductionCommand, FieldErrors> {
        let mut errors = FieldErrors::new();
        let item_id: Option<ItemId> = parse_required(&self.item_id, "itemId", "部品", &mut errors);
        let production_date = match self.production_date.trim() {
            "" => {
                errors.add("productionDate", "请输入生产日期");
                None
            }
            raw => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.add("productionDate", "日期格式应为 yyyy-MM-dd");
                    None
                }
            },
        };
        let total_quantity = parse_count(&self.total_quantity, "totalQuantity", "总生产量", &mut errors);

        match (item_id, production_date, total_quantity) {
            (Some(item_id), Some(production_date), Some(total_quantity)) if errors.is_empty() => {
                Ok(CreateDailyProductionCommand {
                    item_id,
                    production_date,
                    total_quantity,
                })
            }
            _ => Err(errors),
        }
    }

    pub fn to_update_command(
        &self,
        production_id: DailyProductionId,
    ) -> Result<UpdateDailyProductionCommand, FieldErrors> {
        let mut errors = FieldErrors::new();
        match parse_count(&self.total_quantity, "totalQuantity", "总生产量", &mut errors) {
            Some(total_quantity) => Ok(UpdateDailyProductionCommand {
                production_id,
                total_quantity,
            }),
            None => Err(errors),
        }
    }

    pub async fn submit(&mut self, handler: &ServiceHandler) -> Option<DailyProduction> {
        self.errors = FieldErrors::new();
        let result = match self.editing {
            Some(id) => match self.to_update_command(id) {
                Ok(cmd) => handler.update_daily_production(cmd).await,
                Err(errors) => {
                    self.errors = errors;
                    return None;
                }
            },
            None => match self.to_create_command() {
                Ok(cmd) => handler.create_daily_production(cmd).await,
                Err(errors) => {
                    self.errors = errors;
                    return None;
                }
            },
        };

        match result {
            Ok(production) => {
                *self = if self.editing.is_some() {
                    Self::for_edit(&production)
                } else {
                    Self::default()
                };
                Some(production)
            }
            Err(e) => {
                self.errors = into_form_errors(e);
                None
            }
        }
    }
}
