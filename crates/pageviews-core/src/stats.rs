use serde::Serialize;

// ── Percentile helper ─────────────────────────────────────────────────────────

/// Compute the `p`-th percentile of a **sorted** slice using standard linear
/// interpolation (the same algorithm used by NumPy's `percentile` function
/// and pandas' `Series.quantile`).
///
/// Returns `0.0` for an empty slice.
pub fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    if sorted_data.is_empty() {
        return 0.0;
    }
    let len = sorted_data.len();
    if len == 1 {
        return sorted_data[0];
    }
    let rank = (p / 100.0) * (len as f64 - 1.0);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted_data[lo];
    }
    let frac = rank - lo as f64;
    sorted_data[lo] + frac * (sorted_data[hi] - sorted_data[lo])
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

// ── Box-plot summary ──────────────────────────────────────────────────────────

/// Whisker reach as a multiple of the interquartile range.
pub const WHISKER_IQR_FACTOR: f64 = 1.5;

/// Five-number summary plus outliers for one box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest observation at or above `q1 - 1.5 * IQR`.
    pub lower_whisker: f64,
    /// Largest observation at or below `q3 + 1.5 * IQR`.
    pub upper_whisker: f64,
    /// Observations beyond the whiskers, ascending.
    pub outliers: Vec<f64>,
    pub count: usize,
}

impl BoxStats {
    /// Summarise `values` (any order). Returns `None` when there is nothing
    /// to summarise.
    ///
    /// Quartiles use linear interpolation; whiskers stop at the most extreme
    /// data point still inside the `1.5 × IQR` fences, matching the
    /// matplotlib / seaborn convention.
    pub fn compute(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let q1 = percentile(&sorted, 25.0);
        let median = percentile(&sorted, 50.0);
        let q3 = percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR_FACTOR * iqr;
        let high_fence = q3 + WHISKER_IQR_FACTOR * iqr;

        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);

        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < lower_whisker || v > upper_whisker)
            .collect();

        Some(Self {
            q1,
            median,
            q3,
            lower_whisker,
            upper_whisker,
            outliers,
            count: sorted.len(),
        })
    }

    /// Lowest point drawn for this box, outliers included.
    pub fn min_drawn(&self) -> f64 {
        self.outliers
            .first()
            .copied()
            .map_or(self.lower_whisker, |o| o.min(self.lower_whisker))
    }

    /// Highest point drawn for this box, outliers included.
    pub fn max_drawn(&self) -> f64 {
        self.outliers
            .last()
            .copied()
            .map_or(self.upper_whisker, |o| o.max(self.upper_whisker))
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
