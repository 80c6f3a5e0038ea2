mod bootstrap;
mod runner;

use anyhow::{bail, Context, Result};
use pageviews_core::settings::Settings;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(settings.effective_log_level())?;

    tracing::info!("pageviews v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Input: {}, output dir: {}, quantiles: {}..{}",
        settings.input.display(),
        settings.output_dir.display(),
        settings.lower_quantile,
        settings.upper_quantile
    );

    let summary = runner::run(&settings)
        .with_context(|| format!("could not prepare charts from {}", settings.input.display()))?;

    if let Some(path) = settings.summary.as_ref() {
        runner::write_summary(&summary, path)
            .with_context(|| format!("could not write run summary to {}", path.display()))?;
    }

    if !summary.all_ok() {
        let failures = summary.failures();
        for outcome in &failures {
            eprintln!(
                "{} chart failed: {}",
                outcome.chart,
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
        bail!(
            "{} of {} charts failed to render",
            failures.len(),
            summary.charts.len()
        );
    }

    tracing::info!("All {} charts rendered", summary.charts.len());
    Ok(())
}
