//! Load-and-clean pipeline.
//!
//! Reads the CSV, applies the quantile filter once and returns the cleaned
//! table together with metadata about the run, ready for the renderers.

use std::path::Path;

use chrono::NaiveDate;
use pageviews_core::{Bounds, CleanedTable, QuantileRange, Result};
use serde::Serialize;
use tracing::info;

use crate::cleaner::clean;
use crate::reader::load_records;

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the cleaned table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadMetadata {
    /// Rows parsed from the input file.
    pub rows_loaded: usize,
    /// Rows dropped by the quantile filter.
    pub rows_removed: usize,
    /// Filter bounds, `None` when the input had no rows.
    pub bounds: Option<Bounds>,
    /// First and last date in the cleaned table.
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    /// Wall-clock seconds spent reading and parsing the file.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent filtering.
    pub clean_time_seconds: f64,
}

/// The complete output of [`load_and_clean`].
#[derive(Debug, Clone)]
pub struct LoadResult {
    pub table: CleanedTable,
    pub metadata: LoadMetadata,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the loader/cleaner stage.
///
/// 1. Parse every row of `path` into records (any bad row aborts).
/// 2. Compute the `range` quantiles over all values and drop the rest.
/// 3. Sort the survivors by date.
///
/// An empty file produces an empty table; deciding whether that is fatal is
/// left to the caller.
pub fn load_and_clean(path: &Path, range: QuantileRange) -> Result<LoadResult> {
    range.validate()?;

    // ── Step 1: Load records ──────────────────────────────────────────────────
    let load_start = std::time::Instant::now();
    let records = load_records(path)?;
    let load_time_seconds = load_start.elapsed().as_secs_f64();

    // ── Step 2: Filter ────────────────────────────────────────────────────────
    let clean_start = std::time::Instant::now();
    let table = clean(&records, range);
    let clean_time_seconds = clean_start.elapsed().as_secs_f64();

    let (first_date, last_date) = table
        .date_range()
        .map_or((None, None), |(first, last)| (Some(first), Some(last)));

    let metadata = LoadMetadata {
        rows_loaded: records.len(),
        rows_removed: table.removed(),
        bounds: table.bounds(),
        first_date,
        last_date,
        load_time_seconds,
        clean_time_seconds,
    };

    info!(
        "Loaded {} rows from {}, kept {} after removing {} outliers",
        metadata.rows_loaded,
        path.display(),
        table.len(),
        metadata.rows_removed
    );

    Ok(LoadResult { table, metadata })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
