//! 系统代码

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemCode {
    pub code_group: String,
    pub code_key: String,
    #[serde(default)]
    pub code_value: String,
    #[serde(default)]
    pub description: Option<String>,
}
