//! Groupings that feed the bar and box charts.
//!
//! Everything here derives new structures from a borrowed [`CleanedTable`];
//! the table itself is never modified.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use pageviews_core::dates::{month_abbrev, month_index, MONTH_ABBREVS};
use pageviews_core::stats::{self, BoxStats};
use pageviews_core::CleanedTable;
use serde::Serialize;

// ── MonthlyMean ───────────────────────────────────────────────────────────────

/// Average page views of one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyMean {
    pub year: i32,
    /// Calendar month, `1` = January.
    pub month: u32,
    pub mean: f64,
    /// Number of daily readings averaged.
    pub count: usize,
}

/// Monthly means ordered by year, then January→December.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlyMeans {
    rows: Vec<MonthlyMean>,
}

impl MonthlyMeans {
    pub fn rows(&self) -> &[MonthlyMean] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.rows.iter().map(|r| r.year).collect();
        years.dedup();
        years
    }

    /// Mean for `(year, month)`, `None` when that month has no data.
    pub fn get(&self, year: i32, month: u32) -> Option<f64> {
        self.rows
            .iter()
            .find(|r| r.year == year && r.month == month)
            .map(|r| r.mean)
    }

    /// Largest mean across all groups.
    pub fn max_mean(&self) -> Option<f64> {
        self.rows.iter().map(|r| r.mean).reduce(f64::max)
    }
}

// ── BoxFrame ──────────────────────────────────────────────────────────────────

/// A cleaned reading with its derived grouping fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxFrameRow {
    pub date: NaiveDate,
    pub value: f64,
    pub year: i32,
    /// Abbreviated month name, e.g. `"Jan"`.
    pub month: &'static str,
}

/// One labelled box: the raw values of a group and their summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxGroup {
    pub label: String,
    pub values: Vec<f64>,
    /// `None` when the group has no readings.
    pub stats: Option<BoxStats>,
}

impl BoxGroup {
    fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        let stats = BoxStats::compute(&values);
        Self {
            label: label.into(),
            values,
            stats,
        }
    }
}

/// Cleaned readings augmented with `year` and `month`, no aggregation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoxFrame {
    rows: Vec<BoxFrameRow>,
}

impl BoxFrame {
    /// One box per calendar year present, ascending.
    pub fn yearly_groups(&self) -> Vec<BoxGroup> {
        let mut by_year: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
        for row in &self.rows {
            by_year.entry(row.year).or_default().push(row.value);
        }
        by_year
            .into_iter()
            .map(|(year, values)| BoxGroup::new(year.to_string(), values))
            .collect()
    }

    /// Exactly twelve boxes, `Jan` through `Dec`, all years pooled.
    ///
    /// Months without readings are still present with empty values and no
    /// stats.
    pub fn monthly_groups(&self) -> Vec<BoxGroup> {
        let mut by_month: [Vec<f64>; 12] = Default::default();
        for row in &self.rows {
            by_month[month_index(row.date)].push(row.value);
        }
        MONTH_ABBREVS
            .iter()
            .zip(by_month)
            .map(|(label, values)| BoxGroup::new(*label, values))
            .collect()
    }
}

// ── PageviewAggregator ────────────────────────────────────────────────────────

/// Stateless helper that derives chart inputs from a cleaned table.
pub struct PageviewAggregator;

impl PageviewAggregator {
    /// Arithmetic mean of the readings in each `(year, month)` present.
    ///
    /// Months with no readings are absent, not zero-filled.
    pub fn monthly_means(table: &CleanedTable) -> MonthlyMeans {
        // BTreeMap keeps (year, month) in calendar order.
        let mut groups: BTreeMap<(i32, u32), Vec<f64>> = BTreeMap::new();
        for record in table.records() {
            groups
                .entry((record.date.year(), record.date.month()))
                .or_default()
                .push(record.value);
        }

        let rows = groups
            .into_iter()
            .filter_map(|((year, month), values)| {
                Some(MonthlyMean {
                    year,
                    month,
                    mean: stats::mean(&values)?,
                    count: values.len(),
                })
            })
            .collect();

        MonthlyMeans { rows }
    }

    /// Copy the table's readings into a frame with derived grouping fields.
    pub fn box_frame(table: &CleanedTable) -> BoxFrame {
        let rows = table
            .records()
            .iter()
            .map(|r| BoxFrameRow {
                date: r.date,
                value: r.value,
                year: r.date.year(),
                month: month_abbrev(r.date),
            })
            .collect();
        BoxFrame { rows }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pageviews_core::Record;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table(records: Vec<Record>) -> CleanedTable {
        CleanedTable::from_filtered(records, None, 0)
    }

    fn constant_days(from: NaiveDate, to: NaiveDate, value: f64) -> Vec<Record> {
        let mut records = Vec::new();
        let mut date = from;
        while date <= to {
            records.push(Record::new(date, value));
            date += Duration::days(1);
        }
        records
    }

    // ── monthly_means ────────────────────────────────────────────────────────

    #[test]
    fn test_monthly_means_of_known_groups() {
        let t = table(vec![
            Record::new(day(2017, 1, 3), 10.0),
            Record::new(day(2017, 1, 20), 20.0),
            Record::new(day(2017, 2, 1), 7.0),
            Record::new(day(2018, 1, 1), 1.0),
            Record::new(day(2018, 1, 2), 2.0),
            Record::new(day(2018, 1, 3), 6.0),
        ]);
        let means = PageviewAggregator::monthly_means(&t);

        assert_eq!(means.len(), 3);
        assert_eq!(means.get(2017, 1), Some(15.0));
        assert_eq!(means.get(2017, 2), Some(7.0));
        assert_eq!(means.get(2018, 1), Some(3.0));
        assert_eq!(means.rows()[2].count, 3);
        assert_eq!(means.max_mean(), Some(15.0));
    }

    #[test]
    fn test_monthly_mean_equals_mean_of_group_values() {
        let values = [101.0, 250.5, 99.25, 180.0];
        let t = table(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| Record::new(day(2016, 8, i as u32 + 1), *v))
                .collect(),
        );
        let means = PageviewAggregator::monthly_means(&t);
        assert_eq!(means.get(2016, 8), stats::mean(&values));
        assert_eq!(means.rows()[0].count, 4);
    }

    #[test]
    fn test_monthly_means_missing_months_absent() {
        let t = table(vec![
            Record::new(day(2017, 3, 1), 5.0),
            Record::new(day(2017, 11, 1), 9.0),
        ]);
        let means = PageviewAggregator::monthly_means(&t);
        assert_eq!(means.len(), 2);
        assert_eq!(means.get(2017, 4), None);
    }

    #[test]
    fn test_monthly_means_calendar_order() {
        // December seen before January; years out of order.
        let t = table(vec![
            Record::new(day(2018, 12, 1), 1.0),
            Record::new(day(2018, 1, 1), 1.0),
            Record::new(day(2017, 6, 1), 1.0),
        ]);
        let means = PageviewAggregator::monthly_means(&t);
        let keys: Vec<(i32, u32)> = means.rows().iter().map(|r| (r.year, r.month)).collect();
        assert_eq!(keys, vec![(2017, 6), (2018, 1), (2018, 12)]);
        assert_eq!(means.years(), vec![2017, 2018]);
    }

    #[test]
    fn test_two_constant_years_give_24_equal_bars() {
        let t = table(constant_days(day(2017, 1, 1), day(2018, 12, 31), 50.0));
        let means = PageviewAggregator::monthly_means(&t);
        assert_eq!(means.len(), 24);
        assert!(means.rows().iter().all(|r| r.mean == 50.0));
    }

    #[test]
    fn test_monthly_means_empty_table() {
        let means = PageviewAggregator::monthly_means(&table(Vec::new()));
        assert!(means.is_empty());
        assert!(means.years().is_empty());
        assert_eq!(means.max_mean(), None);
    }

    // ── box_frame ────────────────────────────────────────────────────────────

    #[test]
    fn test_box_frame_derives_year_and_month() {
        let t = table(vec![Record::new(day(2019, 7, 4), 42.0)]);
        let frame = PageviewAggregator::box_frame(&t);
        let row = &frame.rows[0];
        assert_eq!(row.year, 2019);
        assert_eq!(row.month, "Jul");
        assert_eq!(row.value, 42.0);
        assert_eq!(t.len(), 1, "source table untouched");
    }

    #[test]
    fn test_yearly_groups_ascending_with_raw_values() {
        let t = table(vec![
            Record::new(day(2019, 1, 1), 3.0),
            Record::new(day(2018, 5, 1), 1.0),
            Record::new(day(2018, 6, 1), 2.0),
        ]);
        let groups = PageviewAggregator::box_frame(&t).yearly_groups();
        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["2018", "2019"]);
        assert_eq!(groups[0].values, vec![1.0, 2.0]);
        assert_eq!(groups[0].stats.as_ref().unwrap().median, 1.5);
    }

    #[test]
    fn test_monthly_groups_always_twelve_in_order() {
        let t = table(vec![
            Record::new(day(2018, 3, 1), 10.0),
            Record::new(day(2019, 3, 1), 30.0),
            Record::new(day(2019, 12, 1), 5.0),
        ]);
        let groups = PageviewAggregator::box_frame(&t).monthly_groups();

        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, MONTH_ABBREVS.to_vec());

        // March pools both years.
        assert_eq!(groups[2].values, vec![10.0, 30.0]);
        assert_eq!(groups[2].stats.as_ref().unwrap().median, 20.0);
        assert!(groups[11].stats.is_some());

        // Empty months keep their slot but have no box.
        assert!(groups[0].values.is_empty());
        assert!(groups[0].stats.is_none());
    }

    #[test]
    fn test_monthly_groups_empty_frame() {
        let groups = BoxFrame::default().monthly_groups();
        assert_eq!(groups.len(), 12);
        assert!(groups.iter().all(|g| g.stats.is_none()));
    }
}
