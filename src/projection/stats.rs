//! Summary statistics across Monte Carlo iterations

use log::warn;
use serde::{Deserialize, Serialize};

/// Cross-iteration statistics for one projection year
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct YearStatistics {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub p10: f64,
    pub p90: f64,
}

impl YearStatistics {
    /// Summarize a set of samples
    ///
    /// An empty slice yields all zeros. Samples are sorted in place.
    pub fn from_samples(samples: &mut [f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        samples.sort_by(|a, b| a.total_cmp(b));

        let mean = mean(samples);
        Self {
            mean,
            median: percentile_sorted(samples, 50.0),
            std_dev: std_dev(samples, mean),
            p10: percentile_sorted(samples, 10.0),
            p90: percentile_sorted(samples, 90.0),
        }
    }

    /// Statistics for a single deterministic value
    pub fn constant(value: f64) -> Self {
        Self {
            mean: value,
            median: value,
            std_dev: 0.0,
            p10: value,
            p90: value,
        }
    }

    /// Multiply every statistic by a non-negative factor
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            mean: self.mean * factor,
            median: self.median * factor,
            std_dev: self.std_dev * factor.abs(),
            p10: self.p10 * factor,
            p90: self.p90 * factor,
        }
    }
}

/// Arithmetic mean, zero for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Population standard deviation around a known mean
pub fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Percentile of already-sorted values with linear interpolation between ranks
///
/// `pct` is in [0, 100]. Matches the usual "linear" definition where the
/// 0th percentile is the minimum and the 100th the maximum.
pub fn percentile_sorted(sorted: &[f64], pct: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = (pct.clamp(0.0, 100.0) / 100.0) * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            let frac = rank - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}

/// Percentile of unsorted values
pub fn percentile(values: &[f64], pct: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    percentile_sorted(&sorted, pct)
}

/// Division that substitutes a fallback for a zero or non-finite denominator
///
/// Per-capita and rate-ratio calculations go through here so a degenerate
/// input produces a usable number plus a warning instead of NaN or infinity.
pub fn guarded_div(numerator: f64, denominator: f64, fallback: f64, context: &str) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        warn!(
            "degenerate arithmetic in {}: denominator {} replaced by fallback {}",
            context, denominator, fallback
        );
        fallback
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_percentile_interpolation() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(percentile_sorted(&values, 50.0), 3.0);
        assert_relative_eq!(percentile_sorted(&values, 10.0), 1.4);
        assert_relative_eq!(percentile_sorted(&values, 90.0), 4.6);
        assert_relative_eq!(percentile_sorted(&values, 0.0), 1.0);
        assert_relative_eq!(percentile_sorted(&values, 100.0), 5.0);
    }

    #[test]
    fn test_from_samples() {
        let mut samples = vec![4.0, 1.0, 3.0, 2.0];
        let stats = YearStatistics::from_samples(&mut samples);
        assert_relative_eq!(stats.mean, 2.5);
        assert_relative_eq!(stats.median, 2.5);
        assert_relative_eq!(stats.std_dev, 1.25f64.sqrt());
    }

    #[test]
    fn test_empty_samples() {
        let stats = YearStatistics::from_samples(&mut []);
        assert_eq!(stats, YearStatistics::default());
    }

    #[test]
    fn test_guarded_div() {
        assert_relative_eq!(guarded_div(10.0, 4.0, 0.0, "test"), 2.5);
        assert_eq!(guarded_div(10.0, 0.0, 0.0, "test"), 0.0);
        assert_eq!(guarded_div(10.0, f64::NAN, 1.0, "test"), 1.0);
    }

    proptest! {
        #[test]
        fn test_percentiles_ordered(mut samples in prop::collection::vec(-1e6f64..1e6, 1..200)) {
            let stats = YearStatistics::from_samples(&mut samples);
            let min = samples[0];
            let max = samples[samples.len() - 1];
            prop_assert!(min <= stats.p10 + 1e-9);
            prop_assert!(stats.p10 <= stats.median + 1e-9);
            prop_assert!(stats.median <= stats.p90 + 1e-9);
            prop_assert!(stats.p90 <= max + 1e-9);
            prop_assert!(stats.mean >= min - 1e-6 && stats.mean <= max + 1e-6);
        }
    }
}
