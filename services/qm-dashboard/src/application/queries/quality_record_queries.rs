//! 质量记录查询

use common::types::Pagination;

use crate::application::views::{FilterMode, RecordFilter, RecordSortColumn, SortState};
use crate::domain::value_objects::QualityRecordId;

/// 质量记录列表默认每页条数
pub const DEFAULT_RECORD_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone)]
pub struct GetQualityRecordQuery {
    pub record_id: QualityRecordId,
}

/// 质量记录列表查询
///
/// 修改筛选条件会回到第一页；翻页与排序不会。
#[derive(Debug, Clone)]
pub struct QualityRecordViewQuery {
    filter: RecordFilter,
    pub pagination: Pagination,
    pub sort: SortState<RecordSortColumn>,
    pub mode: FilterMode,
}

impl Default for QualityRecordViewQuery {
    fn default() -> Self {
        Self {
            filter: RecordFilter::default(),
            pagination: Pagination::new(0, DEFAULT_RECORD_PAGE_SIZE),
            sort: SortState::default(),
            mode: FilterMode::default(),
        }
    }
}

impl QualityRecordViewQuery {
    pub fn new(filter: RecordFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: FilterMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn with_sort(mut self, sort: SortState<RecordSortColumn>) -> Self {
        self.sort = sort;
        self
    }

    pub fn filter(&self) -> &RecordFilter {
        &self.filter
    }

    /// 修改筛选条件并回到第一页
    pub fn update_filter(&mut self, update: impl FnOnce(&mut RecordFilter)) {
        let before = self.filter.clone();
        update(&mut self.filter);
        if self.filter != before {
            self.pagination.page_index = 0;
        }
    }

    pub fn go_to_page(&mut self, page_index: u32) {
        self.pagination.page_index = page_index;
    }

    pub fn set_page_size(&mut self, page_size: u32) {
        self.pagination = self.pagination.with_page_size(page_size);
    }

    pub fn toggle_sort(&mut self, column: RecordSortColumn) {
        self.sort.toggle(column);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ItemId;

    #[test]
    fn test_default_page_size() {
        let query = QualityRecordViewQuery::default();
        assert_eq!(query.pagination, Pagination::new(0, 10));
        assert_eq!(query.mode, FilterMode::Local);
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut query = QualityRecordViewQuery::default();
        query.go_to_page(3);
        query.toggle_sort(RecordSortColumn::NgRate);
        assert_eq!(query.pagination.page_index, 3);

        query.update_filter(|f| f.set_item(Some(ItemId(7))));
        assert_eq!(query.pagination.page_index, 0);
        assert_eq!(query.filter().item_id(), Some(ItemId(7)));
        assert_eq!(query.sort.column(), Some(RecordSortColumn::NgRate));
    }

    #[test]
    fn test_unchanged_filter_keeps_page() {
        let mut query = QualityRecordViewQuery::default();
        query.go_to_page(2);
        query.update_filter(|f| f.set_item(None));
        assert_eq!(query.pagination.page_index, 2);
    }
}
