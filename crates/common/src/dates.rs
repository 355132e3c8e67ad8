//! 日期区间与年月

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid year-month '{0}', expected yyyy-MM")]
pub struct ParseYearMonthError(pub String);

/// 日期区间，两端均包含
///
/// 起始日按当天 00:00:00 比较，结束日按当天 23:59:59.999 比较。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    fn start_of_day(date: NaiveDate) -> NaiveDateTime {
        date.and_time(NaiveTime::MIN)
    }

    fn end_of_day(date: NaiveDate) -> NaiveDateTime {
        date.and_hms_milli_opt(23, 59, 59, 999)
            .unwrap_or_else(|| Self::start_of_day(date))
    }

    pub fn contains_at(&self, at: NaiveDateTime) -> bool {
        if let Some(start) = self.start {
            if at < Self::start_of_day(start) {
                return false;
            }
        }
        if let Some(end) = self.end {
            if at > Self::end_of_day(end) {
                return false;
            }
        }
        true
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.contains_at(Self::start_of_day(date))
    }
}

/// 年月筛选
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ParseYearMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseYearMonthError(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(err)?;
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u32 = month.parse().map_err(|_| err())?;
        Self::new(year, month).ok_or_else(err)
    }
}
