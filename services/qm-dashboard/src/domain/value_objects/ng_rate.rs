//! NG 率（不良率）
//!
//! `ng / (ok + ng) * 100`，保留两位小数，四舍五入（远离零）。
//! 使用整数运算保存百分比的百分位，避免浮点误差造成 `0.005` 一类边界值舍入不一致。
//! 单条记录与汇总统计共用同一计算。

use std::fmt;

use serde::{Serialize, Serializer};

/// NG 率，内部单位为 0.01%
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NgRate {
    hundredths: u64,
}

impl NgRate {
    pub const ZERO: NgRate = NgRate { hundredths: 0 };

    /// 由 OK/NG 数量计算
    pub fn from_counts(ok_quantity: u64, ng_quantity: u64) -> Self {
        let total = ok_quantity as u128 + ng_quantity as u128;
        Self::compute(total, ng_quantity as u128)
    }

    /// 由总数量与 NG 数量计算（汇总统计）
    pub fn from_totals(total_quantity: u64, ng_quantity: u64) -> Self {
        Self::compute(total_quantity as u128, ng_quantity as u128)
    }

    fn compute(total: u128, ng: u128) -> Self {
        if total == 0 {
            return Self::ZERO;
        }
        // round(ng * 10000 / total) = floor((2 * ng * 10000 + total) / (2 * total))
        let hundredths = (2 * ng * 10_000 + total) / (2 * total);
        Self {
            hundredths: u64::try_from(hundredths).unwrap_or(u64::MAX),
        }
    }

    pub fn hundredths(&self) -> u64 {
        self.hundredths
    }

    /// 百分比数值，仅用于与阈值比较及绘图
    pub fn as_percent(&self) -> f64 {
        self.hundredths as f64 / 100.0
    }

    pub fn is_zero(&self) -> bool {
        self.hundredths == 0
    }
}

impl fmt::Display for NgRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.hundredths / 100, self.hundredths % 100)
    }
}

impl Serialize for NgRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// 计算 NG 率并格式化为两位小数字符串
pub fn compute_ng_rate(ok_quantity: u64, ng_quantity: u64) -> String {
    NgRate::from_counts(ok_quantity, ng_quantity).to_string()
}
