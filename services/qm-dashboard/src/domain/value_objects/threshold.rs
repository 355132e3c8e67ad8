//! 行业平均 NG 率阈值
//!
//! 阈值存放于系统代码 `INDUSTRY_AVERAGE / NG_RATE_THRESHOLD`，单位为百分比。
//!
//! 评价需求（`evaluationRequired`）由后端判定：NG 率高于阈值，或达到同一部品前一日 NG 率的两倍及以上。
//! 本地只用阈值做高亮提示，不推导评价需求。

use crate::domain::entities::SystemCode;

use super::NgRate;

pub const THRESHOLD_CODE_GROUP: &str = "INDUSTRY_AVERAGE";
pub const THRESHOLD_CODE_KEY: &str = "NG_RATE_THRESHOLD";
pub const DEFAULT_THRESHOLD_PERCENT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndustryThreshold(f64);

impl Default for IndustryThreshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD_PERCENT)
    }
}

impl IndustryThreshold {
    /// 非有限值回退为默认阈值
    pub fn new(percent: f64) -> Self {
        if percent.is_finite() {
            Self(percent)
        } else {
            Self::default()
        }
    }

    pub fn percent(&self) -> f64 {
        self.0
    }

    /// 严格大于阈值才算超出
    pub fn is_exceeded_by(&self, rate: NgRate) -> bool {
        rate.as_percent() > self.0
    }

    /// 从系统代码中查找阈值，缺失或无法解析时使用默认值
    pub fn from_system_codes(codes: &[SystemCode]) -> Self {
        codes
            .iter()
            .find(|c| c.code_group == THRESHOLD_CODE_GROUP && c.code_key == THRESHOLD_CODE_KEY)
            .and_then(|c| c.code_value.trim().parse::<f64>().ok())
            .map(Self::new)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(group: &str, key: &str, value: &str) -> SystemCode {
        SystemCode {
            code_group: group.to_string(),
            code_key: key.to_string(),
            code_value: value.to_string(),
            description: None,
        }
    }

    #[test]
    fn test_strictly_greater() {
        let threshold = IndustryThreshold::new(0.5);
        assert!(!threshold.is_exceeded_by(NgRate::from_counts(995, 5)));
        assert!(threshold.is_exceeded_by(NgRate::from_counts(990, 10)));
        assert!(!threshold.is_exceeded_by(NgRate::ZERO));
    }

    #[test]
    fn test_lookup_from_system_codes() {
        let codes = vec![
            code("OTHER", THRESHOLD_CODE_KEY, "9"),
            code(THRESHOLD_CODE_GROUP, THRESHOLD_CODE_KEY, "1.25"),
        ];
        assert_eq!(IndustryThreshold::from_system_codes(&codes).percent(), 1.25);
    }

    #[test]
    fn test_default_when_missing_or_invalid() {
        assert_eq!(IndustryThreshold::from_system_codes(&[]).percent(), 0.5);
        let codes = vec![code(THRESHOLD_CODE_GROUP, THRESHOLD_CODE_KEY, "n/a")];
        assert_eq!(IndustryThreshold::from_system_codes(&codes).percent(), 0.5);
        assert_eq!(IndustryThreshold::new(f64::NAN).percent(), 0.5);
    }
}
