//! 汇总统计视图（按工序 / 按部品）与 NG 率图表

use std::cmp::Ordering;

use serde::Serialize;

use crate::domain::entities::{AggregateStatistic, ItemStatistic};
use crate::domain::value_objects::{IndustryThreshold, NgRate};

use super::sort::SortState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatisticSortColumn {
    TotalQuantity,
    TotalNgQuantity,
    NgRate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticRow<T> {
    #[serde(flatten)]
    pub statistic: T,
    pub ng_rate: NgRate,
    pub exceeds_threshold: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsView<T> {
    pub rows: Vec<StatisticRow<T>>,
    pub threshold: IndustryThreshold,
}

impl<T: AggregateStatistic> StatisticsView<T> {
    /// 未选择排序列时保持后端顺序
    pub fn build(
        statistics: Vec<T>,
        threshold: IndustryThreshold,
        sort: &SortState<StatisticSortColumn>,
    ) -> Self {
        let mut rows: Vec<StatisticRow<T>> = statistics
            .into_iter()
            .map(|statistic| {
                let ng_rate = statistic.ng_rate();
                StatisticRow {
                    statistic,
                    ng_rate,
                    exceeds_threshold: threshold.is_exceeded_by(ng_rate),
                }
            })
            .collect();
        sort.sort_by(&mut rows, compare_statistic);
        Self { rows, threshold }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_quantity(&self) -> u64 {
        self.rows.iter().map(|r| r.statistic.total_quantity()).sum()
    }

    pub fn total_ng_quantity(&self) -> u64 {
        self.rows.iter().map(|r| r.statistic.total_ng_quantity()).sum()
    }

    /// 全部行合计的 NG 率
    pub fn overall_ng_rate(&self) -> NgRate {
        NgRate::from_totals(self.total_quantity(), self.total_ng_quantity())
    }
}

fn compare_statistic<T: AggregateStatistic>(
    a: &StatisticRow<T>,
    b: &StatisticRow<T>,
    column: StatisticSortColumn,
) -> Ordering {
    match column {
        StatisticSortColumn::TotalQuantity => a
            .statistic
            .total_quantity()
            .cmp(&b.statistic.total_quantity()),
        StatisticSortColumn::TotalNgQuantity => a
            .statistic
            .total_ng_quantity()
            .cmp(&b.statistic.total_ng_quantity()),
        StatisticSortColumn::NgRate => a.ng_rate.cmp(&b.ng_rate),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    pub label: String,
    pub name: String,
    pub ng_rate: NgRate,
    pub exceeds_threshold: bool,
}

/// 部品 NG 率柱状图，按 NG 率降序
#[derive(Debug, Clone, PartialEq)]
pub struct NgRateChart {
    pub bars: Vec<ChartBar>,
    pub threshold: IndustryThreshold,
}

impl NgRateChart {
    pub fn from_item_statistics(statistics: &[ItemStatistic], threshold: IndustryThreshold) -> Self {
        let mut bars: Vec<ChartBar> = statistics
            .iter()
            .map(|stat| {
                let ng_rate = stat.ng_rate();
                ChartBar {
                    label: stat.item_code.clone(),
                    name: stat.item_name.clone(),
                    ng_rate,
                    exceeds_threshold: threshold.is_exceeded_by(ng_rate),
                }
            })
            .collect();
        bars.sort_by(|a, b| b.ng_rate.cmp(&a.ng_rate));
        Self { bars, threshold }
    }

    pub fn max_rate(&self) -> NgRate {
        self.bars.iter().map(|b| b.ng_rate).max().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
