//! 终端输出

pub mod chart;
pub mod table;

pub use chart::render_chart;
pub use table::{
    TextTable, incomplete_notice, render_evaluation_queue, render_item_detail, render_items,
    render_process_detail, render_processes, render_productions, render_records,
    render_statistics,
};
