//! 日产量命令

use chrono::NaiveDate;

use crate::domain::entities::{DailyProductionUpdate, NewDailyProduction};
use crate::domain::value_objects::{DailyProductionId, ItemId};

#[derive(Debug, Clone, PartialEq)]
pub struct CreateDailyProductionCommand {
    pub item_id: ItemId,
    pub production_date: NaiveDate,
    pub total_quantity: u64,
}

impl CreateDailyProductionCommand {
    pub fn to_request(&self) -> NewDailyProduction {
        NewDailyProduction {
            item_id: self.item_id,
            production_date: self.production_date,
            total_quantity: self.total_quantity,
        }
    }
}

/// 只修改总生产量
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateDailyProductionCommand {
    pub production_id: DailyProductionId,
    pub total_quantity: u64,
}

impl UpdateDailyProductionCommand {
    pub fn to_request(&self) -> DailyProductionUpdate {
        DailyProductionUpdate {
            total_quantity: self.total_quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteDailyProductionCommand {
    pub production_id: DailyProductionId,
}
