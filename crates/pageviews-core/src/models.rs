use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PageviewError, Result};
use crate::stats::percentile;

/// A single daily page-view reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Calendar day of the reading.
    pub date: NaiveDate,
    /// Page views recorded on that day.
    pub value: f64,
}

impl Record {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Quantile fractions used to trim extreme values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantileRange {
    /// Lower cut, e.g. `0.025` for the 2.5th percentile.
    pub lower: f64,
    /// Upper cut, e.g. `0.975` for the 97.5th percentile.
    pub upper: f64,
}

impl Default for QuantileRange {
    fn default() -> Self {
        Self {
            lower: 0.025,
            upper: 0.975,
        }
    }
}

impl QuantileRange {
    /// Build a range, rejecting fractions outside `[0, 1]` or `lower >= upper`.
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        let range = Self { lower, upper };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<()> {
        let in_unit = |q: f64| q.is_finite() && (0.0..=1.0).contains(&q);
        if !in_unit(self.lower) || !in_unit(self.upper) {
            return Err(PageviewError::Config(format!(
                "quantiles must lie in [0, 1], got {} and {}",
                self.lower, self.upper
            )));
        }
        if self.lower >= self.upper {
            return Err(PageviewError::Config(format!(
                "lower quantile {} must be below upper quantile {}",
                self.lower, self.upper
            )));
        }
        Ok(())
    }
}

/// Inclusive value interval a cleaned table was filtered with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    /// Compute bounds from the full, unfiltered value distribution.
    ///
    /// Returns `None` for an empty slice since no quantile is defined.
    pub fn from_values(values: &[f64], range: QuantileRange) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Some(Self {
            lower: percentile(&sorted, range.lower * 100.0),
            upper: percentile(&sorted, range.upper * 100.0),
        })
    }

    /// Both ends are inclusive.
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Records that survived outlier removal, sorted ascending by date.
///
/// Only the cleaner builds these from raw records, so a cleaned table is
/// never silently filtered a second time. Re-filtering has to go through
/// [`CleanedTable::refilter`] or an explicit re-clean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanedTable {
    records: Vec<Record>,
    bounds: Option<Bounds>,
    removed: usize,
}

impl CleanedTable {
    /// Assemble a table from already-filtered records. Sorts by date, keeping
    /// the input order of equal dates.
    pub fn from_filtered(mut records: Vec<Record>, bounds: Option<Bounds>, removed: usize) -> Self {
        records.sort_by_key(|r| r.date);
        Self {
            records,
            bounds,
            removed,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Bounds used for filtering; `None` when the input was empty.
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Number of input rows dropped as outliers.
    pub fn removed(&self) -> usize {
        self.removed
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.value).collect()
    }

    /// First and last date in the table.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }

    /// Apply fixed `bounds` to this table without recomputing quantiles.
    ///
    /// Using the table's own bounds returns an identical table.
    pub fn refilter(&self, bounds: Bounds) -> CleanedTable {
        let kept: Vec<Record> = self
            .records
            .iter()
            .copied()
            .filter(|r| bounds.contains(r.value))
            .collect();
        let removed = self.removed + (self.records.len() - kept.len());
        CleanedTable::from_filtered(kept, Some(bounds), removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_quantile_range_default() {
        let range = QuantileRange::default();
        assert_eq!(range.lower, 0.025);
        assert_eq!(range.upper, 0.975);
        assert!(range.validate().is_ok());
    }

    #[test]
    fn test_quantile_range_rejects_inverted() {
        assert!(QuantileRange::new(0.9, 0.1).is_err());
        assert!(QuantileRange::new(0.5, 0.5).is_err());
    }

    #[test]
    fn test_quantile_range_rejects_out_of_unit_interval() {
        assert!(QuantileRange::new(-0.1, 0.5).is_err());
        assert!(QuantileRange::new(0.1, 1.5).is_err());
        assert!(QuantileRange::new(f64::NAN, 0.5).is_err());
    }

    #[test]
    fn test_bounds_empty_is_none() {
        assert!(Bounds::from_values(&[], QuantileRange::default()).is_none());
    }

    #[test]
    fn test_bounds_unsorted_input() {
        let values = vec![5.0, 1.0, 3.0, 2.0, 4.0];
        let bounds = Bounds::from_values(&values, QuantileRange::new(0.0, 1.0).unwrap()).unwrap();
        assert_eq!(bounds.lower, 1.0);
        assert_eq!(bounds.upper, 5.0);
    }

    #[test]
    fn test_bounds_contains_is_inclusive() {
        let bounds = Bounds {
            lower: 10.0,
            upper: 20.0,
        };
        assert!(bounds.contains(10.0));
        assert!(bounds.contains(20.0));
        assert!(!bounds.contains(9.999));
        assert!(!bounds.contains(20.001));
    }

    #[test]
    fn test_cleaned_table_sorts_by_date_stably() {
        let table = CleanedTable::from_filtered(
            vec![
                Record::new(day(2020, 1, 3), 3.0),
                Record::new(day(2020, 1, 1), 1.0),
                Record::new(day(2020, 1, 3), 4.0),
            ],
            None,
            0,
        );
        let values = table.values();
        assert_eq!(values, vec![1.0, 3.0, 4.0]);
        assert_eq!(table.date_range(), Some((day(2020, 1, 1), day(2020, 1, 3))));
    }

    #[test]
    fn test_refilter_with_own_bounds_is_noop() {
        let bounds = Bounds {
            lower: 2.0,
            upper: 4.0,
        };
        let table = CleanedTable::from_filtered(
            vec![
                Record::new(day(2020, 1, 1), 2.0),
                Record::new(day(2020, 1, 2), 3.0),
                Record::new(day(2020, 1, 3), 4.0),
            ],
            Some(bounds),
            2,
        );
        assert_eq!(table.refilter(bounds), table);
    }

    #[test]
    fn test_refilter_tighter_bounds_counts_removed() {
        let table = CleanedTable::from_filtered(
            vec![
                Record::new(day(2020, 1, 1), 2.0),
                Record::new(day(2020, 1, 2), 3.0),
                Record::new(day(2020, 1, 3), 4.0),
            ],
            None,
            1,
        );
        let narrowed = table.refilter(Bounds {
            lower: 2.5,
            upper: 3.5,
        });
        assert_eq!(narrowed.values(), vec![3.0]);
        assert_eq!(narrowed.removed(), 3);
        assert_eq!(table.len(), 3, "source table must be untouched");
    }

    #[test]
    fn test_empty_table_has_no_date_range() {
        let table = CleanedTable::from_filtered(Vec::new(), None, 0);
        assert!(table.is_empty());
        assert!(table.date_range().is_none());
        assert!(table.bounds().is_none());
    }
}
