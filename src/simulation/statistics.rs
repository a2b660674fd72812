use serde::{Deserialize, Serialize};

use crate::domain::GammaParams;

use super::runner::SimulationRecord;

/// Number of buckets used by [`histogram`].
pub const HISTOGRAM_BINS: usize = 30;

/// Summary statistics over a batch of efficiency ratios or durations
///. All fields are `None`/empty for an empty sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleStatistics {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub stddev: f64,
    /// Keyed by percentile (10, 25, 50, 75, 90, 95).
    pub percentiles: Vec<(u8, f64)>,
}

const PERCENTILES: [u8; 6] = [10, 25, 50, 75, 90, 95];

/// Computes [`SampleStatistics`] over `samples`. Returns `None` for an
/// empty batch rather than dividing by zero.
pub fn compute(samples: &[f64]) -> Option<SampleStatistics> {
    if samples.is_empty() {
        return None;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let count = sorted.len();
    let mean = sorted.iter().sum::<f64>() / count as f64;
    let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

    let percentiles = PERCENTILES.iter().map(|&p| (p, percentile(&sorted, p as f64))).collect();

    Some(SampleStatistics {
        count,
        mean,
        median: percentile(&sorted, 50.0),
        min: sorted[0],
        max: sorted[count - 1],
        stddev: variance.sqrt(),
        percentiles,
    })
}

/// Nearest-rank percentile over an already-sorted sample.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let frac = rank - lower as f64;
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}

/// Fixed-bin-count histogram. Returns an empty vector for an empty or
/// degenerate (`min == max`) sample.
pub fn histogram(samples: &[f64]) -> Vec<usize> {
    if samples.is_empty() {
        return Vec::new();
    }
    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (max - min).abs() < f64::EPSILON {
        let mut bins = vec![0; HISTOGRAM_BINS];
        bins[0] = 1;
        return bins;
    }

    let width = (max - min) / HISTOGRAM_BINS as f64;
    let mut bins = vec![0usize; HISTOGRAM_BINS];
    for &value in samples {
        let index = (((value - min) / width) as usize).min(HISTOGRAM_BINS - 1);
        bins[index] += 1;
    }
    bins
}

/// Empirical CDF: fraction of `samples` that are `<= x`.
pub fn ecdf(samples: &[f64], x: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().filter(|&&v| v <= x).count() as f64 / samples.len() as f64
}

/// Sanity check of a batch's observed theoretical-minimum durations against
/// the analytic expectation for a chain of `gamma`-distributed task
/// durations: `gamma.mean() * mean_cp_length`. A large `relative_error`
/// flags a batch whose topology or sampling diverged from the assumption
/// that every task shares `gamma`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TheoreticalValidation {
    pub observed_mean_theoretical: f64,
    pub expected_mean_theoretical: f64,
    pub mean_cp_length: f64,
    pub relative_error: f64,
}

/// Computes [`TheoreticalValidation`] over `records`. Returns `None` for an
/// empty batch.
pub fn validate_theoretical(records: &[SimulationRecord], gamma: GammaParams) -> Option<TheoreticalValidation> {
    if records.is_empty() {
        return None;
    }
    let count = records.len() as f64;
    let observed_mean_theoretical = records.iter().map(|r| r.theoretical_duration).sum::<f64>() / count;
    let mean_cp_length = records.iter().map(|r| r.cp_node_ids.len() as f64).sum::<f64>() / count;
    let expected_mean_theoretical = gamma.mean() * mean_cp_length;
    let relative_error =
        if expected_mean_theoretical > 0.0 { (observed_mean_theoretical - expected_mean_theoretical).abs() / expected_mean_theoretical } else { 0.0 };

    Some(TheoreticalValidation { observed_mean_theoretical, expected_mean_theoretical, mean_cp_length, relative_error })
}
