//! 日产量列表视图：本地按部品与日期筛选，默认按生产日降序

use std::cmp::Ordering;

use common::dates::DateRange;
use serde::Serialize;

use crate::domain::entities::DailyProduction;
use crate::domain::value_objects::ItemId;

use super::record_list::ReferenceLookup;
use super::sort::{SortDirection, SortState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductionSortColumn {
    ProductionDate,
    TotalQuantity,
}

/// 日产量列表的初始排序
pub fn default_production_sort() -> SortState<ProductionSortColumn> {
    SortState::by(ProductionSortColumn::ProductionDate, SortDirection::Desc)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductionFilter {
    pub item_id: Option<ItemId>,
    pub date_range: DateRange,
}

impl ProductionFilter {
    pub fn matches(&self, production: &DailyProduction) -> bool {
        if self.item_id.is_some_and(|id| production.item_id != id) {
            return false;
        }
        self.date_range.contains(production.production_date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyProductionRow {
    pub production: DailyProduction,
    pub item_label: String,
}

pub fn transform_productions(
    productions: Vec<DailyProduction>,
    lookup: &ReferenceLookup,
    filter: &ProductionFilter,
    sort: &SortState<ProductionSortColumn>,
) -> Vec<DailyProductionRow> {
    let mut rows: Vec<DailyProductionRow> = productions
        .into_iter()
        .filter(|p| filter.matches(p))
        .map(|production| DailyProductionRow {
            item_label: lookup
                .item(production.item_id)
                .map(|i| i.label())
                .unwrap_or_else(|| production.item_id.to_string()),
            production,
        })
        .collect();

    sort.sort_by(&mut rows, |a, b, column| -> Ordering {
        match column {
            ProductionSortColumn::ProductionDate => {
                a.production.production_date.cmp(&b.production.production_date)
            }
            ProductionSortColumn::TotalQuantity => {
                a.production.total_quantity.cmp(&b.production.total_quantity)
            }
        }
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::DailyProductionId;
    use chrono::NaiveDate;

    fn production(id: i64, item: i64, day: u32, total: u64) -> DailyProduction {
        DailyProduction {
            id: DailyProductionId(id),
            item_id: ItemId(item),
            production_date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            total_quantity: total,
        }
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let rows = transform_productions(
            vec![production(1, 1, 1, 10), production(2, 1, 3, 5), production(3, 2, 2, 7)],
            &ReferenceLookup::default(),
            &ProductionFilter::default(),
            &default_production_sort(),
        );
        let ids: Vec<i64> = rows.iter().map(|r| r.production.id.0).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert_eq!(rows[0].item_label, "1");
    }

    #[test]
    fn test_filter_by_item_and_inclusive_range() {
        let filter = ProductionFilter {
            item_id: Some(ItemId(1)),
            date_range: DateRange::new(
                NaiveDate::from_ymd_opt(2024, 1, 1),
                NaiveDate::from_ymd_opt(2024, 1, 3),
            ),
        };
        let mut sort = default_production_sort();
        sort.toggle(ProductionSortColumn::TotalQuantity);
        let rows = transform_productions(
            vec![
                production(1, 1, 1, 10),
                production(2, 1, 3, 5),
                production(3, 2, 2, 7),
                production(4, 1, 4, 1),
            ],
            &ReferenceLookup::default(),
            &filter,
            &sort,
        );
        let ids: Vec<i64> = rows.iter().map(|r| r.production.id.0).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
