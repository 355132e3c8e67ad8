//! 部品实体

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ItemId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl Item {
    /// 下拉/表格中使用的 "代码 - 名称"
    pub fn label(&self) -> String {
        format!("{} - {}", self.code, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// 部品修改（代码不可修改），空的可选字段以 null 发送以清除旧值
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdate {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
}
