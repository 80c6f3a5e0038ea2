//! Chart rendering for the page-view visualizer.
//!
//! Each renderer takes a borrowed [`CleanedTable`], derives its own private
//! chart model and writes one PNG through the [`plotters`] bitmap backend.

pub mod bar_chart;
pub mod box_chart;
pub mod line_chart;
pub mod output;
pub mod palette;

use std::path::Path;

use pageviews_core::{ChartKind, CleanedTable, Result};

pub use bar_chart::draw_bar_plot;
pub use box_chart::draw_box_plot;
pub use line_chart::draw_line_plot;

/// Render `chart` for `table` into `path`.
pub fn render_chart(chart: ChartKind, table: &CleanedTable, path: &Path) -> Result<()> {
    match chart {
        ChartKind::Line => draw_line_plot(table, path),
        ChartKind::Bar => draw_bar_plot(table, path),
        ChartKind::Box => draw_box_plot(table, path),
    }
}
