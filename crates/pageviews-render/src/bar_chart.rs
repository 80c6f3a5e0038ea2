//! Average page views per month, clustered by year.

use std::ops::Range;
use std::path::Path;

use pageviews_core::dates::MONTH_NAMES;
use pageviews_core::{ChartKind, CleanedTable, Result};
use pageviews_data::aggregator::{MonthlyMeans, PageviewAggregator};
use plotters::prelude::*;
use tracing::info;

use crate::output::{prepare_output, render_error, FONT};
use crate::palette;

/// Pixel size of the bar chart.
pub const BAR_PLOT_SIZE: (u32, u32) = (1400, 700);

/// Share of one year slot taken by its twelve bars.
const CLUSTER_WIDTH: f64 = 0.8;

/// Empty year slots kept right of the last cluster for the legend.
const LEGEND_SLOTS: f64 = 1.0;

/// One drawn bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Position of the bar's year on the x axis.
    pub year_index: usize,
    pub year: i32,
    /// Calendar month, `1` = January.
    pub month: u32,
    pub mean: f64,
}

impl Bar {
    /// Left and right edge in chart coordinates.
    ///
    /// Every month owns a fixed slot in its cluster, so a missing month
    /// leaves a gap instead of shifting its neighbours.
    pub fn x_span(&self) -> (f64, f64) {
        let width = CLUSTER_WIDTH / 12.0;
        let left = self.year_index as f64 - CLUSTER_WIDTH / 2.0 + (self.month - 1) as f64 * width;
        (left, left + width)
    }
}

/// Everything the bar chart draws.
#[derive(Debug, Clone, PartialEq)]
pub struct BarPlotData {
    /// Cluster labels, ascending.
    pub years: Vec<i32>,
    /// Bars ordered by year, then January→December.
    pub bars: Vec<Bar>,
    pub y_max: f64,
}

impl BarPlotData {
    pub fn from_means(means: &MonthlyMeans) -> Option<Self> {
        if means.is_empty() {
            return None;
        }
        let years = means.years();
        let bars = means
            .rows()
            .iter()
            .map(|row| Bar {
                year_index: years.iter().position(|y| *y == row.year).unwrap_or(0),
                year: row.year,
                month: row.month,
                mean: row.mean,
            })
            .collect();
        let top = means.max_mean().unwrap_or(0.0);
        let y_max = if top > 0.0 { top * 1.1 } else { 1.0 };
        Some(Self { years, bars, y_max })
    }

    /// Horizontal extent: clusters sit on integer positions, followed by
    /// free space for the legend.
    pub fn x_range(&self) -> Range<f64> {
        -0.5..self.years.len() as f64 - 0.5 + LEGEND_SLOTS
    }

    /// Bars of one calendar month across all years.
    pub fn month_bars(&self, month: u32) -> impl Iterator<Item = &Bar> {
        self.bars.iter().filter(move |b| b.month == month)
    }

    /// Year label for an x position, empty between clusters.
    pub fn year_label(&self, x: f64) -> String {
        let nearest = x.round();
        if nearest < 0.0 || (x - nearest).abs() > 1e-6 {
            return String::new();
        }
        self.years
            .get(nearest as usize)
            .map(|y| y.to_string())
            .unwrap_or_default()
    }
}

/// Derive monthly means from `table` and build the bar layout.
pub fn bar_plot_data(table: &CleanedTable) -> Option<BarPlotData> {
    BarPlotData::from_means(&PageviewAggregator::monthly_means(table))
}

/// Render the monthly-average bar chart to `path` as a PNG.
pub fn draw_bar_plot(table: &CleanedTable, path: &Path) -> Result<()> {
    const CHART: ChartKind = ChartKind::Bar;

    let data = bar_plot_data(table).ok_or_else(|| render_error(CHART, path, "no data to plot"))?;
    prepare_output(CHART, path)?;

    let root = BitMapBackend::new(path, BAR_PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| render_error(CHART, path, e))?;

    let n_years = data.years.len();

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(data.x_range(), 0.0..data.y_max)
        .map_err(|e| render_error(CHART, path, e))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n_years + LEGEND_SLOTS as usize)
        .x_label_formatter(&|x: &f64| data.year_label(*x))
        .y_label_formatter(&|v: &f64| format!("{:.0}", v))
        .x_desc("Years")
        .y_desc("Average Page Views")
        .axis_desc_style((FONT, 18))
        .label_style((FONT, 14))
        .draw()
        .map_err(|e| render_error(CHART, path, e))?;

    // Title row of the legend.
    chart
        .draw_series(std::iter::empty::<Rectangle<(f64, f64)>>())
        .map_err(|e| render_error(CHART, path, e))?
        .label("Months");

    for (month0, name) in MONTH_NAMES.iter().enumerate() {
        let month = month0 as u32 + 1;
        if data.month_bars(month).next().is_none() {
            continue;
        }
        let color = palette::month_color(month0);
        let rects = data.month_bars(month).map(|bar| {
            let (left, right) = bar.x_span();
            Rectangle::new([(left, 0.0), (right, bar.mean)], color.filled())
        });
        chart
            .draw_series(rects)
            .map_err(|e| render_error(CHART, path, e))?
            .label(*name)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font((FONT, 14))
        .draw()
        .map_err(|e| render_error(CHART, path, e))?;

    root.present().map_err(|e| render_error(CHART, path, e))?;

    info!(
        "Bar chart with {} bars written to {}",
        data.bars.len(),
        path.display()
    );
    Ok(())
}
