//! 工序实体

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ProcessId;

/// 未设置顺序的工序排在最后
pub const MISSING_SEQUENCE: u32 = 999;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    pub id: ProcessId,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sequence: Option<u32>,
}

impl Process {
    /// 排序用顺序号，未设置（或为 0）时取 999
    pub fn sort_sequence(&self) -> u32 {
        self.sequence
            .filter(|s| *s > 0)
            .unwrap_or(MISSING_SEQUENCE)
    }

    pub fn label(&self) -> String {
        format!("{} - {}", self.code, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn process(sequence: Option<u32>) -> Process {
        Process {
            id: ProcessId(1),
            code: "P10".into(),
            name: "Press".into(),
            description: None,
            sequence,
        }
    }

    #[test]
    fn test_sort_sequence() {
        assert_eq!(process(Some(3)).sort_sequence(), 3);
        assert_eq!(process(None).sort_sequence(), MISSING_SEQUENCE);
        assert_eq!(process(Some(0)).sort_sequence(), MISSING_SEQUENCE);
    }
}
