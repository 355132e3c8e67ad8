//! NG 率横向柱状图

use std::fmt::Write;

use unicode_width::UnicodeWidthStr;

use crate::application::views::NgRateChart;

const BAR_WIDTH: usize = 40;

/// 柱长按最大 NG 率与阈值中较大者缩放，阈值位置用 `|` 标出
pub fn render_chart(chart: &NgRateChart) -> String {
    if chart.is_empty() {
        return "没有统计数据\n".to_string();
    }

    let scale = chart.max_rate().as_percent().max(chart.threshold.percent());
    let columns = |percent: f64| -> usize {
        if scale <= 0.0 {
            0
        } else {
            ((percent / scale) * BAR_WIDTH as f64).round() as usize
        }
    };
    let marker = columns(chart.threshold.percent()).min(BAR_WIDTH);
    let label_width = chart
        .bars
        .iter()
        .map(|b| b.label.width())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for bar in &chart.bars {
        let filled = columns(bar.ng_rate.as_percent()).min(BAR_WIDTH);
        let mut line: Vec<char> = std::iter::repeat_n('#', filled)
            .chain(std::iter::repeat_n(' ', BAR_WIDTH - filled))
            .collect();
        if marker < BAR_WIDTH && line[marker] == ' ' {
            line[marker] = '|';
        }
        let bar_text: String = line.into_iter().collect();
        let pad = label_width.saturating_sub(bar.label.width());
        let _ = writeln!(
            out,
            "{}{} {} {}%{}",
            bar.label,
            " ".repeat(pad),
            bar_text,
            bar.ng_rate,
            if bar.exceeds_threshold { " !" } else { "" }
        );
    }
    let _ = writeln!(out, "| 行业平均 {:.2}%", chart.threshold.percent());
    out
}
