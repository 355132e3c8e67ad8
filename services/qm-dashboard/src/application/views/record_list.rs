//! 质量记录列表视图
//!
//! 原始记录 → 关联部品/工序 → 计算 NG 率与阈值高亮 → 筛选 → 排序 → 分组。
//! 评价需求标记来自后端，阈值高亮由本地计算，两者分别保存。

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;
use common::dates::{DateRange, YearMonth};
use common::types::{PagedResult, Pagination};
use serde::Serialize;

use crate::domain::entities::{Item, Process, QualityRecord, RecordQueryParams, MISSING_SEQUENCE};
use crate::domain::value_objects::{IndustryThreshold, ItemId, NgRate, ProcessId};

use super::grouping::{GroupPosition, group_positions};
use super::sort::SortState;

/// 筛选在哪里生效
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterMode {
    /// 全部条件在本地对已取得的数据生效
    #[default]
    Local,
    /// 部品与日期条件已由后端分页查询应用，本地只处理评价需求筛选
    ServerApplied,
}

/// 列表筛选条件，各条件同时满足
///
/// 日期区间与年月互斥：设置其一会清除另一个。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    item_id: Option<ItemId>,
    date_range: DateRange,
    year_month: Option<YearMonth>,
    evaluation_required_only: bool,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, item_id: Option<ItemId>) -> Self {
        self.set_item(item_id);
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.set_date_range(range);
        self
    }

    pub fn with_month(mut self, year_month: Option<YearMonth>) -> Self {
        self.set_month(year_month);
        self
    }

    pub fn with_evaluation_required_only(mut self, only: bool) -> Self {
        self.evaluation_required_only = only;
        self
    }

    pub fn set_item(&mut self, item_id: Option<ItemId>) {
        self.item_id = item_id;
    }

    pub fn set_start_date(&mut self, start: Option<NaiveDate>) {
        self.set_date_range(DateRange::new(start, self.date_range.end));
    }

    pub fn set_end_date(&mut self, end: Option<NaiveDate>) {
        self.set_date_range(DateRange::new(self.date_range.start, end));
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.date_range = range;
        if !range.is_unbounded() {
            self.year_month = None;
        }
    }

    pub fn set_month(&mut self, year_month: Option<YearMonth>) {
        self.year_month = year_month;
        if year_month.is_some() {
            self.date_range = DateRange::default();
        }
    }

    pub fn set_evaluation_required_only(&mut self, only: bool) {
        self.evaluation_required_only = only;
    }

    pub fn item_id(&self) -> Option<ItemId> {
        self.item_id
    }

    pub fn date_range(&self) -> DateRange {
        self.date_range
    }

    pub fn year_month(&self) -> Option<YearMonth> {
        self.year_month
    }

    pub fn evaluation_required_only(&self) -> bool {
        self.evaluation_required_only
    }

    /// 可由后端处理的条件（评价需求筛选不在其中）
    pub fn to_query_params(&self, pagination: Pagination) -> RecordQueryParams {
        RecordQueryParams::new(pagination)
            .with_item(self.item_id)
            .with_date_range(self.date_range)
            .with_month(self.year_month)
    }

    pub fn matches(&self, row: &QualityRecordRow, mode: FilterMode) -> bool {
        if self.evaluation_required_only && !row.evaluation_required {
            return false;
        }
        if mode == FilterMode::ServerApplied {
            return true;
        }
        if let Some(item_id) = self.item_id {
            if row.record.item_id != Some(item_id) {
                return false;
            }
        }
        if !self.date_range.is_unbounded() {
            match row.record.production_date {
                Some(date) if self.date_range.contains(date) => {}
                _ => return false,
            }
        }
        if let Some(year_month) = self.year_month {
            match row.record.production_date {
                Some(date) if year_month.contains(date) => {}
                _ => return false,
            }
        }
        true
    }
}

/// 部品、工序查找表
#[derive(Debug, Clone, Default)]
pub struct ReferenceLookup {
    items: HashMap<ItemId, Item>,
    processes: HashMap<ProcessId, Process>,
}

impl ReferenceLookup {
    pub fn new(items: Vec<Item>, processes: Vec<Process>) -> Self {
        Self {
            items: items.into_iter().map(|i| (i.id, i)).collect(),
            processes: processes.into_iter().map(|p| (p.id, p)).collect(),
        }
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn process(&self, id: ProcessId) -> Option<&Process> {
        self.processes.get(&id)
    }
}

/// 可排序的列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordSortColumn {
    ProductionDate,
    ItemCode,
    Process,
    OkQuantity,
    NgQuantity,
    NgRate,
    EvaluationRequired,
}

/// 列表中的一行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityRecordRow {
    pub record: QualityRecord,
    pub item_code: Option<String>,
    pub item_name: Option<String>,
    pub process_label: String,
    #[serde(skip)]
    pub process_sequence: u32,
    pub ng_rate: NgRate,
    /// 后端判定的评价需求
    pub evaluation_required: bool,
    /// 本地 NG 率严格高于已知阈值，仅用于高亮
    pub exceeds_threshold: bool,
    #[serde(skip)]
    pub group: GroupPosition,
}

impl QualityRecordRow {
    pub fn build(record: QualityRecord, lookup: &ReferenceLookup, threshold: IndustryThreshold) -> Self {
        let item = record.item_id.and_then(|id| lookup.item(id));
        let process = lookup.process(record.process_id);
        let ng_rate = record.ng_rate();
        Self {
            item_code: item.map(|i| i.code.clone()),
            item_name: item.map(|i| i.name.clone()),
            process_label: process
                .map(Process::label)
                .unwrap_or_else(|| record.process_id.to_string()),
            process_sequence: process.map_or(MISSING_SEQUENCE, Process::sort_sequence),
            ng_rate,
            evaluation_required: record.evaluation_required,
            exceeds_threshold: threshold.is_exceeded_by(ng_rate),
            group: GroupPosition::default(),
            record,
        }
    }

    pub fn production_date(&self) -> Option<NaiveDate> {
        self.record.production_date
    }

    fn group_key(&self) -> (Option<NaiveDate>, Option<&str>) {
        (self.record.production_date, self.item_code.as_deref())
    }
}

/// 默认顺序：生产日升序 → 部品代码 → 工序顺序（未设置排最后）
fn default_order(a: &QualityRecordRow, b: &QualityRecordRow) -> Ordering {
    a.record
        .production_date
        .cmp(&b.record.production_date)
        .then_with(|| a.item_code.cmp(&b.item_code))
        .then_with(|| a.process_sequence.cmp(&b.process_sequence))
}

fn compare_column(a: &QualityRecordRow, b: &QualityRecordRow, column: RecordSortColumn) -> Ordering {
    match column {
        RecordSortColumn::ProductionDate => a.record.production_date.cmp(&b.record.production_date),
        RecordSortColumn::ItemCode => a.item_code.cmp(&b.item_code),
        RecordSortColumn::Process => a.process_sequence.cmp(&b.process_sequence),
        RecordSortColumn::OkQuantity => a.record.ok_quantity.cmp(&b.record.ok_quantity),
        RecordSortColumn::NgQuantity => a.record.ng_quantity.cmp(&b.record.ng_quantity),
        RecordSortColumn::NgRate => a.ng_rate.cmp(&b.ng_rate),
        RecordSortColumn::EvaluationRequired => a.evaluation_required.cmp(&b.evaluation_required),
    }
}

/// 变换记录为展示行
pub fn transform_records(
    records: Vec<QualityRecord>,
    lookup: &ReferenceLookup,
    threshold: IndustryThreshold,
    filter: &RecordFilter,
    sort: &SortState<RecordSortColumn>,
    mode: FilterMode,
) -> Vec<QualityRecordRow> {
    let mut rows: Vec<QualityRecordRow> = records
        .into_iter()
        .map(|record| QualityRecordRow::build(record, lookup, threshold))
        .filter(|row| filter.matches(row, mode))
        .collect();

    if sort.column().is_some() {
        sort.sort_by(&mut rows, compare_column);
    } else {
        rows.sort_by(default_order);
    }

    assign_groups(&mut rows);
    rows
}

fn assign_groups(rows: &mut [QualityRecordRow]) {
    let groups = group_positions(rows, |row| {
        let (date, code) = row.group_key();
        (date, code.map(str::to_owned))
    });
    for (row, group) in rows.iter_mut().zip(groups) {
        row.group = group;
    }
}

/// 一页列表
#[derive(Debug, Clone)]
pub struct QualityRecordListView {
    pub page: PagedResult<QualityRecordRow>,
    pub threshold: IndustryThreshold,
    /// 生成本页时的筛选方式
    pub mode: FilterMode,
    /// 结果可能不完整：后端分页时评价需求筛选只覆盖当前页；本地筛选时取回数量达到上限
    pub possibly_incomplete: bool,
}

impl QualityRecordListView {
    pub fn build(
        page: PagedResult<QualityRecord>,
        lookup: &ReferenceLookup,
        threshold: IndustryThreshold,
        filter: &RecordFilter,
        sort: &SortState<RecordSortColumn>,
        mode: FilterMode,
    ) -> Self {
        let possibly_incomplete = mode == FilterMode::ServerApplied
            && filter.evaluation_required_only()
            && page.total_pages() > 1;
        let PagedResult {
            items,
            total_count,
            page_index,
            page_size,
        } = page;
        let rows = transform_records(items, lookup, threshold, filter, sort, mode);
        Self {
            page: PagedResult {
                items: rows,
                total_count,
                page_index,
                page_size,
            },
            threshold,
            mode,
            possibly_incomplete,
        }
    }

    /// 全部记录在本地筛选排序后再分页，分组按当前页重新计算
    ///
    /// `fetched` 为未带筛选条件取回的记录；若后端仍返回了多页，结果可能不完整。
    pub fn paginate_local(
        fetched: PagedResult<QualityRecord>,
        lookup: &ReferenceLookup,
        threshold: IndustryThreshold,
        filter: &RecordFilter,
        sort: &SortState<RecordSortColumn>,
        pagination: Pagination,
    ) -> Self {
        let possibly_incomplete = fetched.total_pages() > 1;
        let rows = transform_records(
            fetched.items,
            lookup,
            threshold,
            filter,
            sort,
            FilterMode::Local,
        );
        let total_count = rows.len() as u64;
        let start = (pagination.offset() as usize).min(rows.len());
        let end = start
            .saturating_add(pagination.page_size as usize)
            .min(rows.len());
        let mut items: Vec<QualityRecordRow> = rows.into_iter().skip(start).take(end - start).collect();
        assign_groups(&mut items);
        Self {
            page: PagedResult::new(items, total_count, &pagination),
            threshold,
            mode: FilterMode::Local,
            possibly_incomplete,
        }
    }

    pub fn rows(&self) -> &[QualityRecordRow] {
        &self.page.items
    }

    pub fn is_empty(&self) -> bool {
        self.page.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::views::sort::SortDirection;
    use crate::domain::value_objects::{DailyProductionId, QualityRecordId};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record(id: i64, day: &str, item: i64, process: i64, ok: u64, ng: u64) -> QualityRecord {
        QualityRecord {
            id: QualityRecordId(id),
            daily_production_id: DailyProductionId(id),
            production_date: Some(date(day)),
            item_id: Some(ItemId(item)),
            process_id: ProcessId(process),
            ok_quantity: ok,
            ng_quantity: ng,
            evaluation_required: false,
            expert_evaluation: None,
        }
    }

    fn lookup() -> ReferenceLookup {
        let item = |id, code: &str| Item {
            id: ItemId(id),
            code: code.into(),
            name: format!("{} name", code),
            description: None,
            category: None,
        };
        let process = |id, code: &str, sequence| Process {
            id: ProcessId(id),
            code: code.into(),
            name: code.to_lowercase(),
            description: None,
            sequence,
        };
        ReferenceLookup::new(
            vec![item(1, "A"), item(2, "B")],
            vec![process(10, "CUT", Some(1)), process(20, "WELD", Some(2)), process(30, "PACK", None)],
        )
    }

    fn ids(rows: &[QualityRecordRow]) -> Vec<i64> {
        rows.iter().map(|r| r.record.id.0).collect()
    }

    #[test]
    fn test_default_order() {
        let records = vec![
            record(1, "2024-01-02", 1, 10, 100, 0),
            record(2, "2024-01-01", 2, 10, 100, 0),
            record(3, "2024-01-01", 1, 30, 100, 0),
            record(4, "2024-01-01", 1, 20, 100, 0),
        ];
        let rows = transform_records(
            records,
            &lookup(),
            IndustryThreshold::default(),
            &RecordFilter::new(),
            &SortState::default(),
            FilterMode::Local,
        );
        assert_eq!(ids(&rows), vec![4, 3, 2, 1]);
        assert_eq!(rows[1].process_sequence, MISSING_SEQUENCE);
        assert!(rows[0].group.start && !rows[0].group.end);
        assert!(rows[1].group.end);
        assert!(rows[2].group.is_single());
    }

    #[test]
    fn test_month_and_range_clear_each_other() {
        let mut filter = RecordFilter::new()
            .with_date_range(DateRange::new(Some(date("2024-01-01")), None));
        filter.set_month(YearMonth::new(2024, 2));
        assert!(filter.date_range().is_unbounded());
        filter.set_end_date(Some(date("2024-03-01")));
        assert_eq!(filter.year_month(), None);
    }

    #[test]
    fn test_server_applied_mode_only_filters_evaluation_flag() {
        let mut flagged = record(1, "2024-01-01", 1, 10, 90, 10);
        flagged.evaluation_required = true;
        let plain = record(2, "2024-05-01", 2, 10, 100, 0);
        let filter = RecordFilter::new()
            .with_item(Some(ItemId(2)))
            .with_evaluation_required_only(true);

        let local = transform_records(
            vec![flagged.clone(), plain.clone()],
            &lookup(),
            IndustryThreshold::default(),
            &filter,
            &SortState::default(),
            FilterMode::Local,
        );
        assert!(local.is_empty());

        let server = transform_records(
            vec![flagged, plain],
            &lookup(),
            IndustryThreshold::default(),
            &filter,
            &SortState::default(),
            FilterMode::ServerApplied,
        );
        assert_eq!(ids(&server), vec![1]);
    }

    #[test]
    fn test_column_sort_by_rate() {
        let records = vec![
            record(1, "2024-01-01", 1, 10, 995, 5),
            record(2, "2024-01-01", 1, 20, 990, 10),
            record(3, "2024-01-01", 1, 30, 1000, 0),
        ];
        let sort = SortState::by(RecordSortColumn::NgRate, SortDirection::Desc);
        let rows = transform_records(
            records,
            &lookup(),
            IndustryThreshold::default(),
            &RecordFilter::new(),
            &sort,
            FilterMode::Local,
        );
        assert_eq!(ids(&rows), vec![2, 1, 3]);
        assert!(rows[0].exceeds_threshold);
        assert!(!rows[1].exceeds_threshold);
    }

    #[test]
    fn test_unknown_references_fall_back_to_ids() {
        let mut orphan = record(9, "2024-01-01", 99, 77, 1, 1);
        orphan.item_id = None;
        let row = QualityRecordRow::build(orphan, &lookup(), IndustryThreshold::default());
        assert_eq!(row.item_code, None);
        assert_eq!(row.process_label, "77");
        assert_eq!(row.process_sequence, MISSING_SEQUENCE);
    }

    #[test]
    fn test_local_pagination_regroups_each_page() {
        let records = vec![
            record(1, "2024-01-01", 1, 10, 100, 0),
            record(2, "2024-01-01", 1, 20, 100, 0),
            record(3, "2024-01-01", 1, 30, 100, 0),
            record(4, "2024-01-02", 2, 10, 100, 0),
        ];
        let view = QualityRecordListView::paginate_local(
            PagedResult::single_page(records),
            &lookup(),
            IndustryThreshold::default(),
            &RecordFilter::new(),
            &SortState::default(),
            Pagination::new(1, 2),
        );
        assert_eq!(view.page.total_count, 4);
        assert_eq!(ids(view.rows()), vec![3, 4]);
        assert!(view.rows()[0].group.is_single());
        assert!(view.rows()[1].group.is_single());
        assert!(!view.possibly_incomplete);

        let view = QualityRecordListView::paginate_local(
            PagedResult::single_page(Vec::new()),
            &lookup(),
            IndustryThreshold::default(),
            &RecordFilter::new(),
            &SortState::default(),
            Pagination::new(5, 10),
        );
        assert!(view.is_empty());
    }

    #[test]
    fn test_possibly_incomplete_only_for_paged_evaluation_filter() {
        let page = PagedResult::new(
            vec![record(1, "2024-01-01", 1, 10, 1, 0)],
            45,
            &Pagination::new(0, 10),
        );
        let filter = RecordFilter::new().with_evaluation_required_only(true);
        let view = QualityRecordListView::build(
            page.clone(),
            &lookup(),
            IndustryThreshold::default(),
            &filter,
            &SortState::default(),
            FilterMode::ServerApplied,
        );
        assert!(view.possibly_incomplete);
        assert!(view.is_empty());
        assert_eq!(view.page.total_count, 45);

        let view = QualityRecordListView::build(
            page,
            &lookup(),
            IndustryThreshold::default(),
            &RecordFilter::new(),
            &SortState::default(),
            FilterMode::ServerApplied,
        );
        assert!(!view.possibly_incomplete);
        assert_eq!(view.rows().len(), 1);
    }
}
