//! CSV loading for the page-view dataset.
//!
//! Reads `(date, value)` rows from a delimited file, locating both columns by
//! header name, and converts them into [`Record`]s. Any unreadable row is an
//! error carrying the file path and line number; nothing is skipped silently.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use pageviews_core::dates::parse_date;
use pageviews_core::{PageviewError, Record, Result};
use tracing::debug;

/// Name of the column holding the calendar date.
pub const DATE_COLUMN: &str = "date";
/// Name of the column holding the page-view count.
pub const VALUE_COLUMN: &str = "value";

// ── Public API ────────────────────────────────────────────────────────────────

/// Load every record from the CSV file at `path`, in file order.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let file = std::fs::File::open(path).map_err(|source| PageviewError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let records = read_records(file, path)?;
    debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Read records from any reader. `source` is only used for error context.
pub fn read_records<R: Read>(reader: R, source: &Path) -> Result<Vec<Record>> {
    let mut csv_reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| csv_error(source, &e))?
        .clone();
    let date_idx = column_index(&headers, DATE_COLUMN, source)?;
    let value_idx = column_index(&headers, VALUE_COLUMN, source)?;

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row.map_err(|e| csv_error(source, &e))?;
        let line = row.position().map_or(0, |p| p.line());
        records.push(parse_row(&row, date_idx, value_idx, line, source)?);
    }

    Ok(records)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Find a column by case-insensitive header name.
fn column_index(headers: &StringRecord, name: &str, source: &Path) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| PageviewError::MissingColumn {
            path: source.to_path_buf(),
            column: name.to_string(),
        })
}

fn parse_row(
    row: &StringRecord,
    date_idx: usize,
    value_idx: usize,
    line: u64,
    source: &Path,
) -> Result<Record> {
    let date_text = row.get(date_idx).unwrap_or_default();
    let date = parse_date(date_text).ok_or_else(|| PageviewError::DateParse {
        path: source.to_path_buf(),
        line,
        value: date_text.to_string(),
    })?;

    let value_text = row.get(value_idx).unwrap_or_default();
    let value = value_text
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| PageviewError::ValueParse {
            path: source.to_path_buf(),
            line,
            value: value_text.to_string(),
        })?;

    Ok(Record::new(date, value))
}

fn csv_error(source: &Path, err: &csv::Error) -> PageviewError {
    PageviewError::Csv {
        path: source.to_path_buf(),
        message: err.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
