//! Output-path handling shared by the renderers.

use std::fmt::Display;
use std::path::Path;
use std::sync::OnceLock;

use pageviews_core::{ChartKind, PageviewError, Result};
use plotters::style::{register_font, FontStyle};
use tracing::debug;

/// Font family used for every caption and label.
pub const FONT: &str = "sans-serif";

/// DejaVu Sans, shipped with the crate so rendering does not depend on
/// system fonts.
static FONT_BYTES: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Register the bundled font under [`FONT`]. Runs once per process.
pub fn ensure_font(chart: ChartKind, path: &Path) -> Result<()> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    let ok = *REGISTERED.get_or_init(|| {
        debug!("Registering bundled font as \"{}\"", FONT);
        register_font(FONT, FontStyle::Normal, FONT_BYTES).is_ok()
    });
    if ok {
        Ok(())
    } else {
        Err(render_error(chart, path, "bundled font could not be loaded"))
    }
}

/// Register the font and make sure the directory that will hold `path`
/// exists.
pub fn prepare_output(chart: ChartKind, path: &Path) -> Result<()> {
    ensure_font(chart, path)?;
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if !parent.is_dir() {
        debug!("Creating output directory {}", parent.display());
    }
    std::fs::create_dir_all(parent).map_err(|e| render_error(chart, path, e))
}

/// Wrap any backend or I/O failure as a render error for `chart`.
pub fn render_error(chart: ChartKind, path: &Path, err: impl Display) -> PageviewError {
    PageviewError::Render {
        chart,
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Pad a value range so lines and boxes do not touch the frame.
///
/// A flat range is widened by one unit on each side.
pub fn padded_range(min: f64, max: f64) -> (f64, f64) {
    if !(min.is_finite() && max.is_finite()) {
        return (0.0, 1.0);
    }
    let span = max - min;
    if span <= f64::EPSILON * max.abs().max(1.0) {
        return (min - 1.0, max + 1.0);
    }
    let pad = span * 0.05;
    (min - pad, max + pad)
}
