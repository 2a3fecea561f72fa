//! Statistics Calculator Module
//! Box-plot statistics for the yearly composite index distributions.

use crate::data::{Location, PipelineOutput};
use rayon::prelude::*;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// Whisker reach in multiples of the interquartile range.
pub const WHISKER_IQR: f64 = 1.5;

/// Five-number summary plus mean and outliers for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

impl Default for BoxStats {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            q1: f64::NAN,
            median: f64::NAN,
            q3: f64::NAN,
            whisker_low: f64::NAN,
            whisker_high: f64::NAN,
            outliers: Vec::new(),
        }
    }
}

impl BoxStats {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Box statistics keyed by (year, location).
pub type YearlyBoxStats = BTreeMap<(i32, Location), BoxStats>;

/// Handles statistical calculations with multi-threading support.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute box statistics for an array of values.
    pub fn compute_box_stats(values: &[f64]) -> BoxStats {
        let n = values.len();
        if n == 0 {
            return BoxStats::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let q1 = Self::percentile(&sorted, 25.0);
        let median = Self::percentile(&sorted, 50.0);
        let q3 = Self::percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR * iqr;
        let high_fence = q3 + WHISKER_IQR * iqr;

        let whisker_low = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < low_fence || v > high_fence)
            .collect();

        let std = if n > 1 { values.std_dev() } else { 0.0 };

        BoxStats {
            count: n,
            mean: values.mean(),
            std,
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            outliers,
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Compute box statistics for every (year, location) group in parallel.
    pub fn compute_yearly_box_stats(output: &PipelineOutput) -> YearlyBoxStats {
        let groups: Vec<(i32, Location)> = output
            .years()
            .into_iter()
            .flat_map(|year| Location::ALL.into_iter().map(move |loc| (year, loc)))
            .collect();

        groups
            .par_iter()
            .filter_map(|&(year, location)| {
                let values = output.values_for(year, location);
                if values.is_empty() {
                    None
                } else {
                    Some(((year, location), Self::compute_box_stats(&values)))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_matches_numpy_linear() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(StatsCalculator::percentile(&sorted, 50.0), 2.5);
        assert_eq!(StatsCalculator::percentile(&sorted, 25.0), 1.75);
        assert_eq!(StatsCalculator::percentile(&sorted, 75.0), 3.25);
        assert!(StatsCalculator::percentile(&[], 50.0).is_nan());
    }

    #[test]
    fn box_stats_flag_outliers_beyond_whiskers() {
        let values = [10.0, 12.0, 11.0, 13.0, 12.0, 100.0];
        let stats = StatsCalculator::compute_box_stats(&values);

        assert_eq!(stats.count, 6);
        assert_eq!(stats.median, 12.0);
        assert_eq!(stats.outliers, vec![100.0]);
        assert_eq!(stats.whisker_high, 13.0);
        assert_eq!(stats.whisker_low, 10.0);
        assert!(stats.q1 <= stats.median && stats.median <= stats.q3);
    }

    #[test]
    fn single_value_has_zero_spread() {
        let stats = StatsCalculator::compute_box_stats(&[42.0]);
        assert_eq!(stats.q1, 42.0);
        assert_eq!(stats.q3, 42.0);
        assert_eq!(stats.std, 0.0);
        assert!(stats.outliers.is_empty());
    }

    #[test]
    fn empty_group_is_nan() {
        let stats = StatsCalculator::compute_box_stats(&[]);
        assert_eq!(stats.count, 0);
        assert!(stats.mean.is_nan());
    }
}
