//! 展示用视图模型
//!
//! 纯函数变换，不发请求也不缓存结果。

mod grouping;
mod production_list;
mod record_list;
mod sort;
mod statistics;
mod view_state;

pub use grouping::{GroupPosition, group_positions};
pub use production_list::{
    DailyProductionRow, ProductionFilter, ProductionSortColumn, default_production_sort,
    transform_productions,
};
pub use record_list::{
    FilterMode, QualityRecordListView, QualityRecordRow, RecordFilter, RecordSortColumn,
    ReferenceLookup, transform_records,
};
pub use sort::{SortDirection, SortState};
pub use statistics::{ChartBar, NgRateChart, StatisticRow, StatisticSortColumn, StatisticsView};
pub use view_state::ViewState;
