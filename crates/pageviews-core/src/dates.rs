use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use tracing::debug;

/// Abbreviated month names, January first.
pub const MONTH_ABBREVS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Full month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse an ISO 8601-style date or timestamp string into a calendar date.
///
/// Accepts plain dates (`2016-05-09`, `2016/05/09`), naive timestamps with a
/// `T` or space separator, and RFC 3339 timestamps with an offset. For
/// timestamps the calendar date in the timestamp's own offset is kept.
/// Returns `None` for empty or unrecognised input.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    const DATE_FMTS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
    for fmt in DATE_FMTS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    const DATETIME_FMTS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in DATETIME_FMTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.date());
        }
    }

    debug!("could not parse date \"{}\"", s);
    None
}

// ── Month helpers ─────────────────────────────────────────────────────────────

/// Zero-based month index (`0` = January).
pub fn month_index(date: NaiveDate) -> usize {
    date.month0() as usize
}

/// `"Jan"` … `"Dec"` for the date's month.
pub fn month_abbrev(date: NaiveDate) -> &'static str {
    MONTH_ABBREVS[month_index(date)]
}

/// Short human label for a date span, e.g. `"5/2016-12/2019"`.
pub fn span_label(first: NaiveDate, last: NaiveDate) -> String {
    format!(
        "{}/{}-{}/{}",
        first.month(),
        first.year(),
        last.month(),
        last.year()
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────
