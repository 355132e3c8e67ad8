//! 部品命令

use errors::{AppResult, FieldErrors};

use crate::domain::entities::{ItemUpdate, NewItem};
use crate::domain::value_objects::ItemId;

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateItemCommand {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
}

impl CreateItemCommand {
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();
        if self.code.trim().is_empty() {
            errors.add("code", "请输入部品代码");
        }
        if self.name.trim().is_empty() {
            errors.add("name", "请输入部品名称");
        }
        errors.into_result()
    }

    pub fn to_request(&self) -> NewItem {
        NewItem {
            code: self.code.trim().to_string(),
            name: self.name.trim().to_string(),
            description: non_empty(self.description.as_deref()),
            category: non_empty(self.category.as_deref()),
        }
    }
}

/// 修改部品：代码不可修改
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateItemCommand {
    pub item_id: ItemId,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
}

impl UpdateItemCommand {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(errors::AppError::field("name", "请输入部品名称"));
        }
        Ok(())
    }

    pub fn to_request(&self) -> ItemUpdate {
        ItemUpdate {
            name: self.name.trim().to_string(),
            description: non_empty(self.description.as_deref()),
            category: non_empty(self.category.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteItemCommand {
    pub item_id: ItemId,
}
