//! Statistics Calculator Module
//! Descriptive statistics behind the distribution charts (box plot, violin).

use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;

/// Points at which a violin's density outline is evaluated.
pub const DENSITY_POINTS: usize = 100;

/// Whisker reach in multiples of the interquartile range.
const WHISKER_IQR: f64 = 1.5;

/// Box plot statistics for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
    /// Lowest observation within `q1 - 1.5 * IQR`.
    pub whisker_low: f64,
    /// Highest observation within `q3 + 1.5 * IQR`.
    pub whisker_high: f64,
    /// Observations beyond the whiskers.
    pub outliers: Vec<f64>,
}

impl Default for BoxStats {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            median: f64::NAN,
            q1: f64::NAN,
            q3: f64::NAN,
            whisker_low: f64::NAN,
            whisker_high: f64::NAN,
            outliers: Vec::new(),
        }
    }
}

/// Kernel density outline for one violin.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityEstimate {
    pub mean: f64,
    pub median: f64,
    /// `(value, density)` pairs, ascending by value.
    pub points: Vec<(f64, f64)>,
}

impl DensityEstimate {
    pub fn max_density(&self) -> f64 {
        self.points.iter().map(|&(_, d)| d).fold(0.0, f64::max)
    }
}

/// Handles statistical calculations.
#[derive(Debug)]
pub struct StatsCalculator;

impl StatsCalculator {
    /// Box plot statistics with NumPy-compatible quartiles.
    pub fn box_stats(values: &[f64]) -> BoxStats {
        let sorted = Self::sorted_finite(values);
        let n = sorted.len();
        if n == 0 {
            return BoxStats::default();
        }

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
            .filter(|&v| v < whisker_low || v > whisker_high)
            .collect();

        BoxStats {
            count: n,
            mean: sorted.iter().mean(),
            median,
            q1,
            q3,
            whisker_low,
            whisker_high,
            outliers,
        }
    }

    /// Gaussian kernel density over `[min, max]` of the sample, bandwidth by
    /// Scott's rule. Returns `None` for an empty sample.
    ///
    /// A sample without spread collapses to a single point of density 1.
    pub fn density(values: &[f64]) -> Option<DensityEstimate> {
        let sorted = Self::sorted_finite(values);
        let n = sorted.len();
        let (&min, &max) = (sorted.first()?, sorted.last()?);

        let mean = sorted.iter().mean();
        let median = Self::percentile(&sorted, 50.0);
        let std = if n > 1 { sorted.iter().std_dev() } else { 0.0 };

        if std <= 0.0 || max <= min {
            return Some(DensityEstimate {
                mean,
                median,
                points: vec![(min, 1.0)],
            });
        }

        let bandwidth = std * (n as f64).powf(-0.2);
        let kernel = Normal::standard();
        let step = (max - min) / (DENSITY_POINTS - 1) as f64;

        let points = (0..DENSITY_POINTS)
            .map(|i| {
                let y = min + step * i as f64;
                let density = sorted
                    .iter()
                    .map(|&x| kernel.pdf((y - x) / bandwidth))
                    .sum::<f64>()
                    / (n as f64 * bandwidth);
                (y, density)
            })
            .collect();

        Some(DensityEstimate {
            mean,
            median,
            points,
        })
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

    fn sorted_finite(values: &[f64]) -> Vec<f64> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        sorted.sort_by(f64::total_cmp);
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_percentile_matches_numpy() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert!(approx(StatsCalculator::percentile(&sorted, 25.0), 1.75));
        assert!(approx(StatsCalculator::percentile(&sorted, 50.0), 2.5));
        assert!(approx(StatsCalculator::percentile(&sorted, 75.0), 3.25));
        assert!(StatsCalculator::percentile(&[], 50.0).is_nan());
        assert_eq!(StatsCalculator::percentile(&[7.0], 95.0), 7.0);
    }

    #[test]
    fn test_box_stats_with_outlier() {
        let values = [1.0, 2.0, 3.0, 4.0, 100.0];
        let stats = StatsCalculator::box_stats(&values);
        assert_eq!(stats.count, 5);
        assert!(approx(stats.q1, 2.0));
        assert!(approx(stats.median, 3.0));
        assert!(approx(stats.q3, 4.0));
        assert!(approx(stats.mean, 22.0));
        assert_eq!(stats.whisker_low, 1.0);
        assert_eq!(stats.whisker_high, 4.0);
        assert_eq!(stats.outliers, vec![100.0]);
    }

    #[test]
    fn test_box_stats_ignores_nan_and_handles_empty() {
        let stats = StatsCalculator::box_stats(&[f64::NAN, 5.0]);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.median, 5.0);
        assert!(stats.outliers.is_empty());

        let empty = StatsCalculator::box_stats(&[]);
        assert_eq!(empty.count, 0);
        assert!(empty.mean.is_nan());
    }

    #[test]
    fn test_density_spans_sample_range() {
        let values = [0.0, 0.1, 0.5, 0.9, 1.0, 1.0];
        let estimate = StatsCalculator::density(&values).unwrap();
        assert_eq!(estimate.points.len(), DENSITY_POINTS);
        assert_eq!(estimate.points.first().unwrap().0, 0.0);
        assert!(approx(estimate.points.last().unwrap().0, 1.0));
        assert!(estimate.points.iter().all(|&(_, d)| d > 0.0));
        assert!(approx(estimate.median, 0.7));
    }

    #[test]
    fn test_density_degenerate_samples() {
        assert!(StatsCalculator::density(&[]).is_none());

        let flat = StatsCalculator::density(&[1.0, 1.0, 1.0]).unwrap();
        assert_eq!(flat.points, vec![(1.0, 1.0)]);
        assert_eq!(flat.max_density(), 1.0);
    }
}
