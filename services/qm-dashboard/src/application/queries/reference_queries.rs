//! 日产量与统计查询

use common::dates::DateRange;
use common::types::Pagination;

use crate::application::views::{
    ProductionFilter, ProductionSortColumn, SortState, StatisticSortColumn,
    default_production_sort,
};

/// 日产量列表查询
#[derive(Debug, Clone)]
pub struct DailyProductionViewQuery {
    pub filter: ProductionFilter,
    pub pagination: Pagination,
    pub sort: SortState<ProductionSortColumn>,
}

impl Default for DailyProductionViewQuery {
    fn default() -> Self {
        Self {
            filter: ProductionFilter::default(),
            pagination: Pagination::default(),
            sort: default_production_sort(),
        }
    }
}

/// 汇总统计查询
#[derive(Debug, Clone, Default)]
pub struct StatisticsQuery {
    pub range: DateRange,
    pub sort: SortState<StatisticSortColumn>,
}

impl StatisticsQuery {
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            sort: SortState::default(),
        }
    }

    pub fn with_sort(mut self, sort: SortState<StatisticSortColumn>) -> Self {
        self.sort = sort;
        self
    }
}
