//! 强类型 ID 定义
//!
//! 后端使用自增整数主键。

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use std::num::ParseIntError;
use std::str::FromStr;

/// 质量记录 ID
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
#[display("{_0}")]
pub struct QualityRecordId(pub i64);

impl FromStr for QualityRecordId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// 日产量（生产批次）ID
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
#[display("{_0}")]
pub struct DailyProductionId(pub i64);

impl FromStr for DailyProductionId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// 部品 ID
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
#[display("{_0}")]
pub struct ItemId(pub i64);

impl FromStr for ItemId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// 工序 ID
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
#[display("{_0}")]
pub struct ProcessId(pub i64);

impl FromStr for ProcessId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// 用户 ID
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
#[display("{_0}")]
pub struct UserId(pub i64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_transparent_numbers() {
        let id = QualityRecordId(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        let parsed: ItemId = serde_json::from_str("7").unwrap();
        assert_eq!(parsed, ItemId(7));
        assert_eq!(ProcessId::from(3).to_string(), "3");
    }

    #[test]
    fn test_parse_from_str() {
        assert_eq!(" 12 ".parse::<DailyProductionId>().unwrap(), DailyProductionId(12));
        assert!("abc".parse::<QualityRecordId>().is_err());
    }
}
