//! Daily trend line.

use std::path::Path;

use chrono::{Duration, NaiveDate};
use pageviews_core::dates::span_label;
use pageviews_core::{ChartKind, CleanedTable, Result};
use plotters::prelude::*;
use tracing::info;

use crate::output::{padded_range, prepare_output, render_error, FONT};
use crate::palette;

/// Pixel size of the line chart.
pub const LINE_PLOT_SIZE: (u32, u32) = (1400, 700);

/// Everything the line chart draws, in chart coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePlotData {
    pub title: String,
    /// Date at x = 0.
    pub start: NaiveDate,
    /// `(days since start, value)` in chronological order.
    pub points: Vec<(i64, f64)>,
    pub y_range: (f64, f64),
}

impl LinePlotData {
    /// Last x position, at least 1 so a single day still spans the axis.
    pub fn x_end(&self) -> i64 {
        self.points.last().map_or(1, |(x, _)| (*x).max(1))
    }
}

/// Build the line series from the cleaned table. `None` when it is empty.
pub fn line_plot_data(table: &CleanedTable) -> Option<LinePlotData> {
    let (first, last) = table.date_range()?;
    let points: Vec<(i64, f64)> = table
        .records()
        .iter()
        .map(|r| ((r.date - first).num_days(), r.value))
        .collect();

    let min = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);

    Some(LinePlotData {
        title: format!(
            "Daily freeCodeCamp Forum Page Views {}",
            span_label(first, last)
        ),
        start: first,
        points,
        y_range: padded_range(min, max),
    })
}

/// Render the trend line to `path` as a PNG.
pub fn draw_line_plot(table: &CleanedTable, path: &Path) -> Result<()> {
    const CHART: ChartKind = ChartKind::Line;

    let data = line_plot_data(table).ok_or_else(|| render_error(CHART, path, "no data to plot"))?;
    prepare_output(CHART, path)?;

    let root = BitMapBackend::new(path, LINE_PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| render_error(CHART, path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&data.title, (FONT, 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(0i64..data.x_end(), data.y_range.0..data.y_range.1)
        .map_err(|e| render_error(CHART, path, e))?;

    let start = data.start;
    let date_label = |x: &i64| {
        start
            .checked_add_signed(Duration::days(*x))
            .map(|d| d.format("%Y-%m").to_string())
            .unwrap_or_default()
    };

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Page Views")
        .x_label_formatter(&date_label)
        .y_label_formatter(&|v: &f64| format!("{:.0}", v))
        .axis_desc_style((FONT, 18))
        .label_style((FONT, 14))
        .draw()
        .map_err(|e| render_error(CHART, path, e))?;

    chart
        .draw_series(LineSeries::new(
            data.points.iter().copied(),
            palette::LINE.stroke_width(1),
        ))
        .map_err(|e| render_error(CHART, path, e))?;

    root.present().map_err(|e| render_error(CHART, path, e))?;

    info!("Line chart written to {}", path.display());
    Ok(())
}
