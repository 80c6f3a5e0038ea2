//! Quantile-based outlier removal.

use pageviews_core::{Bounds, CleanedTable, QuantileRange, Record};
use tracing::debug;

/// Drop every record whose value falls outside the `range` quantiles of the
/// full input, then sort by date.
///
/// The quantiles are computed once over `records` before anything is
/// removed. Empty input yields an empty table with no bounds. A single record
/// is returned unchanged because both quantiles equal its value.
pub fn clean(records: &[Record], range: QuantileRange) -> CleanedTable {
    let values: Vec<f64> = records.iter().map(|r| r.value).collect();
    let Some(bounds) = Bounds::from_values(&values, range) else {
        debug!("Empty input; skipping quantile filter");
        return CleanedTable::from_filtered(Vec::new(), None, 0);
    };

    let kept: Vec<Record> = records
        .iter()
        .copied()
        .filter(|r| bounds.contains(r.value))
        .collect();
    let removed = records.len() - kept.len();

    debug!(
        "Quantile filter [{:.3}, {:.3}] kept {} of {} records",
        bounds.lower,
        bounds.upper,
        kept.len(),
        records.len()
    );

    CleanedTable::from_filtered(kept, Some(bounds), removed)
}

/// Clean an already-cleaned table again, recomputing quantiles on the
/// filtered values.
///
/// Each pass tightens the bounds, so this is deliberately a separate
/// operation from [`clean`].
pub fn reclean(table: &CleanedTable, range: QuantileRange) -> CleanedTable {
    let again = clean(table.records(), range);
    CleanedTable::from_filtered(
        again.records().to_vec(),
        again.bounds(),
        table.removed() + again.removed(),
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2016, 5, 9).unwrap()
    }

    fn series(values: &[f64]) -> Vec<Record> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Record::new(start() + Duration::days(i as i64), v))
            .collect()
    }

    /// Deterministic values spread evenly over `[100, 200]`.
    fn uniform_100_to_200(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + 100.0 * ((i * 37) % n) as f64 / (n - 1) as f64)
            .collect()
    }

    #[test]
    fn test_empty_input_gives_empty_table() {
        let table = clean(&[], QuantileRange::default());
        assert!(table.is_empty());
        assert!(table.bounds().is_none());
        assert_eq!(table.removed(), 0);
    }

    #[test]
    fn test_single_row_returned_unchanged() {
        let records = series(&[1234.0]);
        let table = clean(&records, QuantileRange::default());
        assert_eq!(table.records(), records.as_slice());
        let bounds = table.bounds().unwrap();
        assert_eq!(bounds.lower, 1234.0);
        assert_eq!(bounds.upper, 1234.0);
    }

    #[test]
    fn test_values_within_bounds_of_full_input() {
        let values: Vec<f64> = (0..=100).map(|x| x as f64).collect();
        let records = series(&values);
        let table = clean(&records, QuantileRange::default());

        // rank 2.5 / 97.5 over 0..=100
        let bounds = table.bounds().unwrap();
        assert!((bounds.lower - 2.5).abs() < 1e-9);
        assert!((bounds.upper - 97.5).abs() < 1e-9);
        assert!(table.records().iter().all(|r| bounds.contains(r.value)));
        assert_eq!(table.len(), 95);
        assert_eq!(table.removed(), 6);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        // 0..=40: P2.5 = 1.0 and P97.5 = 39.0 land exactly on data points
        let values: Vec<f64> = (0..=40).map(|x| x as f64).collect();
        let table = clean(&series(&values), QuantileRange::default());
        let kept = table.values();
        assert_eq!(kept.first(), Some(&1.0));
        assert_eq!(kept.last(), Some(&39.0));
    }

    #[test]
    fn test_injected_outliers_removed() {
        let mut values = uniform_100_to_200(100);
        values[10] = 10_000.0;
        values[60] = -5_000.0;
        let table = clean(&series(&values), QuantileRange::default());

        let kept = table.values();
        assert!(!kept.contains(&10_000.0));
        assert!(!kept.contains(&-5_000.0));
        let min = kept.iter().copied().fold(f64::INFINITY, f64::min);
        let max = kept.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!(min >= 100.0, "min = {min}");
        assert!(max <= 200.0, "max = {max}");
    }

    #[test]
    fn test_result_sorted_by_date() {
        let mut records = series(&[5.0, 6.0, 7.0, 8.0, 9.0]);
        records.reverse();
        let table = clean(&records, QuantileRange::new(0.0, 1.0).unwrap());
        let dates: Vec<NaiveDate> = table.records().iter().map(|r| r.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_duplicate_dates_kept() {
        let day = start();
        let records = vec![
            Record::new(day, 1.0),
            Record::new(day, 2.0),
            Record::new(day, 3.0),
        ];
        let table = clean(&records, QuantileRange::new(0.0, 1.0).unwrap());
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_input_not_mutated() {
        let records = series(&[1.0, 50.0, 100.0]);
        let before = records.clone();
        let _ = clean(&records, QuantileRange::default());
        assert_eq!(records, before);
    }

    #[test]
    fn test_cleaning_is_not_idempotent() {
        let values: Vec<f64> = (0..=100).map(|x| x as f64).collect();
        let once = clean(&series(&values), QuantileRange::default());
        let twice = reclean(&once, QuantileRange::default());

        let first = once.bounds().unwrap();
        let second = twice.bounds().unwrap();
        assert!(second.lower > first.lower);
        assert!(second.upper < first.upper);
        assert!(twice.len() < once.len());
        assert_eq!(twice.removed(), once.removed() + (once.len() - twice.len()));
    }

    #[test]
    fn test_refilter_with_original_bounds_changes_nothing() {
        let values: Vec<f64> = (0..=100).map(|x| x as f64).collect();
        let once = clean(&series(&values), QuantileRange::default());
        let again = once.refilter(once.bounds().unwrap());
        assert_eq!(again, once);
    }
}
