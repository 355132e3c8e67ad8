//! 纯文本表格
//!
//! NG 率保留两位小数，本地超出阈值的行在 NG 率后加 `!`，后端评价需求单独放在 EVAL 列。
//! 同一生产日、同一部品的连续行只在第一行显示日期与部品，组之间加分隔线。

use std::fmt::Write;

use common::types::PagedResult;
use unicode_width::UnicodeWidthStr;

use crate::application::views::{
    DailyProductionRow, FilterMode, QualityRecordListView, QualityRecordRow, StatisticsView,
};
use crate::domain::entities::{AggregateStatistic, Item, Process};
use crate::domain::value_objects::{IndustryThreshold, NgRate};

/// 分页按钮个数
const PAGE_WINDOW: u32 = 5;

#[derive(Debug, Clone, Default)]
pub struct TextTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    /// 在这些行之后画分隔线
    separators: Vec<usize>,
}

impl TextTable {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn push_row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn push_separator(&mut self) {
        if !self.rows.is_empty() {
            self.separators.push(self.rows.len() - 1);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.width()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let len = cell.width();
                match widths.get_mut(i) {
                    Some(w) => *w = (*w).max(len),
                    None => widths.push(len),
                }
            }
        }
        widths
    }

    /// 按终端显示宽度对齐，全角字符占两列
    fn write_line(out: &mut String, cells: &[String], widths: &[usize]) {
        let line = widths
            .iter()
            .enumerate()
            .map(|(i, width)| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                let pad = width.saturating_sub(cell.width());
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let rule = "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1));
        let mut out = String::new();
        Self::write_line(&mut out, &self.headers, &widths);
        out.push_str(&rule);
        out.push('\n');
        for (i, row) in self.rows.iter().enumerate() {
            Self::write_line(&mut out, row, &widths);
            if self.separators.contains(&i) && i + 1 < self.rows.len() {
                out.push_str(&rule);
                out.push('\n');
            }
        }
        out
    }
}

fn rate_cell(rate: NgRate, exceeds: bool) -> String {
    if exceeds {
        format!("{}!", rate)
    } else {
        rate.to_string()
    }
}

fn threshold_line(threshold: IndustryThreshold) -> String {
    format!("行业平均 NG 率阈值: {:.2}%", threshold.percent())
}

fn record_cells(row: &QualityRecordRow, show_group_head: bool) -> Vec<String> {
    let (date, item) = if show_group_head {
        (
            row.production_date()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".into()),
            row.item_code.clone().unwrap_or_else(|| "-".into()),
        )
    } else {
        (String::new(), String::new())
    };
    vec![
        row.record.id.to_string(),
        date,
        item,
        row.process_label.clone(),
        row.record.ok_quantity.to_string(),
        row.record.ng_quantity.to_string(),
        rate_cell(row.ng_rate, row.exceeds_threshold),
        if row.evaluation_required { "Y".into() } else { String::new() },
        if row.record.is_evaluated() { "Y".into() } else { String::new() },
    ]
}

fn record_table(rows: &[QualityRecordRow]) -> TextTable {
    let mut table = TextTable::new(["ID", "DATE", "ITEM", "PROCESS", "OK", "NG", "NG%", "EVAL", "DONE"]);
    for row in rows {
        table.push_row(record_cells(row, row.group.start));
        if row.group.end {
            table.push_separator();
        }
    }
    table
}

fn page_footer<T>(page: &PagedResult<T>) -> String {
    let Some((first, last)) = page.display_range() else {
        return "共 0 条".to_string();
    };
    let mut footer = format!("共 {} 条，第 {}-{} 条", page.total_count, first, last);
    if page.total_pages() > 1 {
        let pages = page
            .page_window(PAGE_WINDOW)
            .map(|p| {
                if p == page.page_index {
                    format!("[{}]", p + 1)
                } else {
                    (p + 1).to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        let _ = write!(footer, " | 页: {} / {}", pages, page.total_pages());
    }
    footer
}

pub fn render_records(view: &QualityRecordListView) -> String {
    let mut out = String::new();
    if view.is_empty() {
        out.push_str("没有符合条件的质量记录\n");
    } else {
        out.push_str(&record_table(view.rows()).render());
    }
    out.push_str(&page_footer(&view.page));
    out.push('\n');
    out.push_str(&threshold_line(view.threshold));
    out.push('\n');
    if let Some(notice) = incomplete_notice(view) {
        out.push_str(notice);
        out.push('\n');
    }
    out
}

/// 结果可能不完整时的提示，按筛选方式区分原因
pub fn incomplete_notice(view: &QualityRecordListView) -> Option<&'static str> {
    if !view.possibly_incomplete {
        return None;
    }
    Some(match view.mode {
        FilterMode::ServerApplied => "注意: 评价需求筛选只作用于当前页，其它页可能还有需要评价的记录",
        FilterMode::Local => "注意: 记录数超过一次取回的上限，只对已取回的记录进行了筛选和排序",
    })
}

pub fn render_evaluation_queue(rows: &[QualityRecordRow]) -> String {
    if rows.is_empty() {
        return "没有需要评价的记录\n".to_string();
    }
    let mut out = record_table(rows).render();
    let _ = writeln!(out, "待评价 {} 条", rows.len());
    out
}

pub fn render_productions(page: &PagedResult<DailyProductionRow>) -> String {
    let mut table = TextTable::new(["ID", "DATE", "ITEM", "TOTAL"]);
    for row in &page.items {
        table.push_row(vec![
            row.production.id.to_string(),
            row.production.production_date.format("%Y-%m-%d").to_string(),
            row.item_label.clone(),
            row.production.total_quantity.to_string(),
        ]);
    }
    let mut out = if table.is_empty() {
        "没有日产量数据\n".to_string()
    } else {
        table.render()
    };
    out.push_str(&page_footer(page));
    out.push('\n');
    out
}

pub fn render_items(items: &[Item]) -> String {
    let mut table = TextTable::new(["ID", "CODE", "NAME", "CATEGORY", "DESCRIPTION"]);
    for item in items {
        table.push_row(vec![
            item.id.to_string(),
            item.code.clone(),
            item.name.clone(),
            item.category.clone().unwrap_or_default(),
            item.description.clone().unwrap_or_default(),
        ]);
    }
    table.render()
}

/// 单个部品的字段/值两列表
pub fn render_item_detail(item: &Item) -> String {
    let mut table = TextTable::new(["FIELD", "VALUE"]);
    table.push_row(vec!["ID".into(), item.id.to_string()]);
    table.push_row(vec!["CODE".into(), item.code.clone()]);
    table.push_row(vec!["NAME".into(), item.name.clone()]);
    table.push_row(vec!["CATEGORY".into(), item.category.clone().unwrap_or_else(|| "-".into())]);
    table.push_row(vec![
        "DESCRIPTION".into(),
        item.description.clone().unwrap_or_else(|| "-".into()),
    ]);
    table.render()
}

pub fn render_process_detail(process: &Process) -> String {
    let mut table = TextTable::new(["FIELD", "VALUE"]);
    table.push_row(vec!["ID".into(), process.id.to_string()]);
    table.push_row(vec![
        "SEQ".into(),
        process.sequence.map(|s| s.to_string()).unwrap_or_else(|| "-".into()),
    ]);
    table.push_row(vec!["CODE".into(), process.code.clone()]);
    table.push_row(vec!["NAME".into(), process.name.clone()]);
    table.push_row(vec![
        "DESCRIPTION".into(),
        process.description.clone().unwrap_or_else(|| "-".into()),
    ]);
    table.render()
}

/// 按工序顺序输出
pub fn render_processes(processes: &[Process]) -> String {
    let mut sorted: Vec<&Process> = processes.iter().collect();
    sorted.sort_by_key(|p| p.sort_sequence());
    let mut table = TextTable::new(["ID", "SEQ", "CODE", "NAME"]);
    for process in sorted {
        table.push_row(vec![
            process.id.to_string(),
            process.sequence.map(|s| s.to_string()).unwrap_or_default(),
            process.code.clone(),
            process.name.clone(),
        ]);
    }
    table.render()
}

pub fn render_statistics<T: AggregateStatistic>(view: &StatisticsView<T>) -> String {
    if view.is_empty() {
        return format!("没有统计数据\n{}\n", threshold_line(view.threshold));
    }
    let mut table = TextTable::new(["CODE", "NAME", "TOTAL", "NG", "NG%"]);
    for row in &view.rows {
        table.push_row(vec![
            row.statistic.code().to_string(),
            row.statistic.name().to_string(),
            row.statistic.total_quantity().to_string(),
            row.statistic.total_ng_quantity().to_string(),
            rate_cell(row.ng_rate, row.exceeds_threshold),
        ]);
    }
    table.push_separator();
    let overall = view.overall_ng_rate();
    table.push_row(vec![
        "合计".to_string(),
        String::new(),
        view.total_quantity().to_string(),
        view.total_ng_quantity().to_string(),
        rate_cell(overall, view.threshold.is_exceeded_by(overall)),
    ]);

    let mut out = table.render();
    out.push_str(&threshold_line(view.threshold));
    out.push('\n');
    out
}
