use clap::Parser;
use std::path::{Path, PathBuf};

use crate::error::{ChartKind, Result};
use crate::models::QuantileRange;

/// Default location of the page-view dataset.
pub const DEFAULT_INPUT: &str = "data/raw/fcc-forum-pageviews.csv";

/// Default directory receiving the rendered charts.
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Clean a daily page-view series and render trend, monthly and seasonal charts
#[derive(Parser, Debug, Clone)]
#[command(
    name = "pageviews",
    about = "Clean a daily page-view series and render trend, monthly and seasonal charts",
    version
)]
pub struct Settings {
    /// CSV file with `date` and `value` columns
    #[arg(env = "PAGEVIEWS_INPUT", default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Directory the PNG charts are written to
    #[arg(long, env = "PAGEVIEWS_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Lower quantile cut applied before charting
    #[arg(long, default_value = "0.025")]
    pub lower_quantile: f64,

    /// Upper quantile cut applied before charting
    #[arg(long, default_value = "0.975")]
    pub upper_quantile: f64,

    /// Render only these charts (comma separated: line,bar,box)
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<ChartKind>,

    /// Write a JSON run summary to this path
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse process arguments.
    pub fn load() -> Self {
        Self::parse()
    }

    /// Validated quantile range from the two cut flags.
    pub fn quantile_range(&self) -> Result<QuantileRange> {
        QuantileRange::new(self.lower_quantile, self.upper_quantile)
    }

    /// Charts to render, in execution order, without duplicates.
    ///
    /// An empty `--only` list selects every chart.
    pub fn charts(&self) -> Vec<ChartKind> {
        if self.only.is_empty() {
            return ChartKind::ALL.to_vec();
        }
        ChartKind::ALL
            .into_iter()
            .filter(|c| self.only.contains(c))
            .collect()
    }

    /// `--debug` wins over `--log-level`.
    pub fn effective_log_level(&self) -> &str {
        if self.debug {
            "DEBUG"
        } else {
            &self.log_level
        }
    }

    /// Full path of one chart's image.
    pub fn chart_path(&self, chart: ChartKind) -> PathBuf {
        chart_path_in(&self.output_dir, chart)
    }
}

/// Path of `chart`'s image inside `output_dir`.
pub fn chart_path_in(output_dir: &Path, chart: ChartKind) -> PathBuf {
    output_dir.join(chart.file_name())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
