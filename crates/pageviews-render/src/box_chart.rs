//! Year-wise and month-wise box plots side by side.

use std::path::Path;

use pageviews_core::{ChartKind, CleanedTable, Result};
use pageviews_data::aggregator::{BoxGroup, PageviewAggregator};
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::info;

use crate::output::{padded_range, prepare_output, render_error, FONT};
use crate::palette;

/// Pixel size of the two-panel box chart.
pub const BOX_PLOT_SIZE: (u32, u32) = (2000, 800);

/// Half the width of a box in category units.
const BOX_HALF_WIDTH: f64 = 0.3;
/// Half the width of a whisker cap.
const CAP_HALF_WIDTH: f64 = 0.15;

/// Which grouping a panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    Yearly,
    Monthly,
}

/// One panel of the box chart.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxPanel {
    pub kind: PanelKind,
    pub title: &'static str,
    pub x_desc: &'static str,
    /// Categories in display order. Groups without data keep their slot.
    pub groups: Vec<BoxGroup>,
}

impl BoxPanel {
    fn yearly(groups: Vec<BoxGroup>) -> Self {
        Self {
            kind: PanelKind::Yearly,
            title: "Year-wise Box Plot (Trend)",
            x_desc: "Year",
            groups,
        }
    }

    fn monthly(groups: Vec<BoxGroup>) -> Self {
        Self {
            kind: PanelKind::Monthly,
            title: "Month-wise Box Plot (Seasonality)",
            x_desc: "Month",
            groups,
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.label.as_str()).collect()
    }

    /// Fill colour of the box at `index`.
    pub fn fill(&self, index: usize) -> RGBColor {
        match self.kind {
            PanelKind::Yearly => palette::YEAR_BOX,
            PanelKind::Monthly => palette::month_color(index),
        }
    }

    /// Value range spanning every whisker and outlier, padded.
    pub fn y_range(&self) -> (f64, f64) {
        let stats = self.groups.iter().filter_map(|g| g.stats.as_ref());
        let (min, max) = stats.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
            (lo.min(s.min_drawn()), hi.max(s.max_drawn()))
        });
        padded_range(min, max)
    }

    /// Category label for an x position, empty between categories.
    pub fn category_label(&self, x: f64) -> String {
        let nearest = x.round();
        if nearest < 0.0 || (x - nearest).abs() > 1e-6 {
            return String::new();
        }
        self.groups
            .get(nearest as usize)
            .map(|g| g.label.clone())
            .unwrap_or_default()
    }
}

/// Build both panels from `table`. `None` when the table is empty.
pub fn box_panels(table: &CleanedTable) -> Option<(BoxPanel, BoxPanel)> {
    if table.is_empty() {
        return None;
    }
    let frame = PageviewAggregator::box_frame(table);
    Some((
        BoxPanel::yearly(frame.yearly_groups()),
        BoxPanel::monthly(frame.monthly_groups()),
    ))
}

/// Render the two-panel box chart to `path` as a PNG.
pub fn draw_box_plot(table: &CleanedTable, path: &Path) -> Result<()> {
    const CHART: ChartKind = ChartKind::Box;

    let (yearly, monthly) =
        box_panels(table).ok_or_else(|| render_error(CHART, path, "no data to plot"))?;
    prepare_output(CHART, path)?;

    let root = BitMapBackend::new(path, BOX_PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| render_error(CHART, path, e))?;

    let areas = root.split_evenly((1, 2));
    for (area, panel) in areas.iter().zip([&yearly, &monthly]) {
        draw_panel(area, panel, path)?;
    }

    root.present().map_err(|e| render_error(CHART, path, e))?;

    info!(
        "Box chart with {} yearly and {} monthly boxes written to {}",
        yearly.groups.len(),
        monthly.groups.len(),
        path.display()
    );
    Ok(())
}

fn draw_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    panel: &BoxPanel,
    path: &Path,
) -> Result<()> {
    const CHART: ChartKind = ChartKind::Box;

    let n = panel.groups.len();
    // Categories sit on integer x positions.
    let x_range = -0.5..n as f64 - 0.5;
    let (y_min, y_max) = panel.y_range();

    let mut chart = ChartBuilder::on(area)
        .caption(panel.title, (FONT, 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range, y_min..y_max)
        .map_err(|e| render_error(CHART, path, e))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n.max(1))
        .x_label_formatter(&|x: &f64| panel.category_label(*x))
        .y_label_formatter(&|v: &f64| format!("{:.0}", v))
        .x_desc(panel.x_desc)
        .y_desc("Page Views")
        .axis_desc_style((FONT, 18))
        .label_style((FONT, 14))
        .draw()
        .map_err(|e| render_error(CHART, path, e))?;

    let mut boxes = Vec::new();
    let mut outlines = Vec::new();
    let mut lines = Vec::new();
    let mut fliers = Vec::new();

    for (i, group) in panel.groups.iter().enumerate() {
        // Months without readings keep their label but get no box.
        let Some(stats) = group.stats.as_ref() else {
            continue;
        };
        let c = i as f64;
        let (left, right) = (c - BOX_HALF_WIDTH, c + BOX_HALF_WIDTH);

        boxes.push(Rectangle::new(
            [(left, stats.q1), (right, stats.q3)],
            panel.fill(i).mix(0.85).filled(),
        ));
        outlines.push(Rectangle::new(
            [(left, stats.q1), (right, stats.q3)],
            palette::OUTLINE.stroke_width(1),
        ));

        lines.push(PathElement::new(
            vec![(left, stats.median), (right, stats.median)],
            palette::OUTLINE.stroke_width(2),
        ));
        lines.push(PathElement::new(
            vec![(c, stats.q1), (c, stats.lower_whisker)],
            palette::OUTLINE.stroke_width(1),
        ));
        lines.push(PathElement::new(
            vec![(c, stats.q3), (c, stats.upper_whisker)],
            palette::OUTLINE.stroke_width(1),
        ));
        for whisker in [stats.lower_whisker, stats.upper_whisker] {
            lines.push(PathElement::new(
                vec![(c - CAP_HALF_WIDTH, whisker), (c + CAP_HALF_WIDTH, whisker)],
                palette::OUTLINE.stroke_width(1),
            ));
        }

        fliers.extend(
            stats
                .outliers
                .iter()
                .map(|&v| Circle::new((c, v), 3, palette::OUTLIER.stroke_width(1))),
        );
    }

    chart
        .draw_series(boxes)
        .map_err(|e| render_error(CHART, path, e))?;
    chart
        .draw_series(outlines)
        .map_err(|e| render_error(CHART, path, e))?;
    chart
        .draw_series(lines)
        .map_err(|e| render_error(CHART, path, e))?;
    chart
        .draw_series(fliers)
        .map_err(|e| render_error(CHART, path, e))?;

    Ok(())
}
