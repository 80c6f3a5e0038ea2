//! One run of the visualizer: load and clean once, then render each chart.
//!
//! Input, configuration and empty-dataset failures abort the run before any
//! chart is drawn. A render failure is recorded against its chart and the
//! remaining charts still run.

use std::path::{Path, PathBuf};

use pageviews_core::settings::Settings;
use pageviews_core::{ChartKind, CleanedTable, PageviewError, Result};
use pageviews_data::analysis::{load_and_clean, LoadMetadata};
use pageviews_render::render_chart;
use serde::Serialize;
use tracing::{error, info};

// ── Public types ──────────────────────────────────────────────────────────────

/// Result of rendering one chart.
#[derive(Debug, Clone, Serialize)]
pub struct ChartOutcome {
    pub chart: ChartKind,
    pub path: PathBuf,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything a run produced, as written to `--summary`.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub input: PathBuf,
    pub load: LoadMetadata,
    pub charts: Vec<ChartOutcome>,
}

impl RunSummary {
    /// Charts that failed to render.
    pub fn failures(&self) -> Vec<&ChartOutcome> {
        self.charts.iter().filter(|c| !c.ok).collect()
    }

    pub fn all_ok(&self) -> bool {
        self.charts.iter().all(|c| c.ok)
    }
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Load, clean and render according to `settings`.
///
/// Returns `Err` only for failures that prevent every chart (bad settings,
/// unreadable input, nothing left after cleaning). Per-chart failures are
/// reported inside the summary.
pub fn run(settings: &Settings) -> Result<RunSummary> {
    let range = settings.quantile_range()?;

    info!("Loading {}", settings.input.display());
    let loaded = load_and_clean(&settings.input, range)?;
    if loaded.table.is_empty() {
        return Err(PageviewError::EmptyDataset(settings.input.clone()));
    }

    let charts = settings
        .charts()
        .into_iter()
        .map(|chart| render_one(chart, &loaded.table, &settings.chart_path(chart)))
        .collect();

    Ok(RunSummary {
        input: settings.input.clone(),
        load: loaded.metadata,
        charts,
    })
}

/// Write `summary` as pretty JSON, creating parent directories.
pub fn write_summary(summary: &RunSummary, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json)?;
    info!("Run summary written to {}", path.display());
    Ok(())
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn render_one(chart: ChartKind, table: &CleanedTable, path: &Path) -> ChartOutcome {
    match render_chart(chart, table, path) {
        Ok(()) => {
            info!("{} chart: ok ({})", chart, path.display());
            ChartOutcome {
                chart,
                path: path.to_path_buf(),
                ok: true,
                error: None,
            }
        }
        Err(e) => {
            error!("{} chart: failed: {}", chart, e);
            ChartOutcome {
                chart,
                path: path.to_path_buf(),
                ok: false,
                error: Some(e.to_string()),
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
