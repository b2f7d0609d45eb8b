// Sample summaries: the (n, mean, std_dev) triple describing one variant's
// observed metric distribution.

use crate::significance::error::{Result, SignificanceError};
use serde::{Deserialize, Serialize};
use trueno::Vector;

/// Summary statistics of one variant's observed metric
///
/// Immutable once captured. Construction validates that the sample is
/// non-empty and that mean and standard deviation are finite with
/// `std_dev >= 0`. A single observation is a valid summary but cannot be
/// compared; the estimator requires at least 2.
///
/// # Example
/// ```
/// use abstat::significance::SampleSummary;
///
/// let control = SampleSummary::new(100, 75.0, 10.0).unwrap();
/// assert_eq!(control.sample_size(), 100);
/// assert!(SampleSummary::new(0, 75.0, 10.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSummary", rename_all = "camelCase")]
pub struct SampleSummary {
    sample_size: u64,
    mean: f64,
    std_dev: f64,
}

/// Unvalidated wire form; accepts both `sampleSize` and `sample_size` keys
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSummary {
    #[serde(alias = "sample_size", alias = "n")]
    sample_size: u64,
    mean: f64,
    #[serde(alias = "std_dev", alias = "stddev")]
    std_dev: f64,
}

impl TryFrom<RawSummary> for SampleSummary {
    type Error = SignificanceError;

    fn try_from(raw: RawSummary) -> Result<Self> {
        SampleSummary::new(raw.sample_size, raw.mean, raw.std_dev)
    }
}

impl SampleSummary {
    /// Create a validated summary
    pub fn new(sample_size: u64, mean: f64, std_dev: f64) -> Result<Self> {
        if sample_size == 0 {
            return Err(SignificanceError::invalid_sample(
                "sample_size must be > 0",
            ));
        }

        if !mean.is_finite() {
            return Err(SignificanceError::invalid_sample(format!(
                "mean must be finite, got {}",
                mean
            )));
        }

        if !std_dev.is_finite() || std_dev < 0.0 {
            return Err(SignificanceError::invalid_sample(format!(
                "std_dev must be finite and non-negative, got {}",
                std_dev
            )));
        }

        Ok(Self {
            sample_size,
            mean,
            std_dev,
        })
    }

    /// Summarize raw observations (e.g., time-on-page in ms, order value)
    ///
    /// Observations are centered on the first value in `f64` and only the
    /// deviations are handed to trueno's `f32` SIMD mean/variance, so large
    /// offsets (1200 ms ± a few ms) keep their precision. trueno reports
    /// population variance (divide by n); the summary carries the
    /// Bessel-corrected sample standard deviation (divide by n - 1). A single
    /// observation yields `std_dev == 0`.
    pub fn from_observations(observations: &[f64]) -> Result<Self> {
        let Some(&reference) = observations.first() else {
            return Err(SignificanceError::invalid_sample(
                "cannot summarize an empty set of observations",
            ));
        };

        if observations.iter().any(|x| !x.is_finite()) {
            return Err(SignificanceError::invalid_sample(
                "observations must be finite",
            ));
        }

        let deviations: Vec<f32> = observations
            .iter()
            .map(|x| (x - reference) as f32)
            .collect();
        if deviations.iter().any(|d| !d.is_finite()) {
            return Err(SignificanceError::invalid_sample(
                "observation spread exceeds f32 range",
            ));
        }

        let vector = Vector::from_slice(&deviations);
        let n = observations.len() as u64;

        let centered_mean = vector.mean().map_err(|e| {
            SignificanceError::invalid_sample(format!("failed to compute mean: {}", e))
        })?;

        let std_dev = if n < 2 {
            0.0
        } else {
            // Variance is shift-invariant, so the centered vector gives it directly
            let population_variance = vector.variance().map_err(|e| {
                SignificanceError::invalid_sample(format!("failed to compute variance: {}", e))
            })? as f64;
            // Clamp float noise on constant inputs
            let sample_variance = (population_variance * n as f64 / (n - 1) as f64).max(0.0);
            sample_variance.sqrt()
        };

        Self::new(n, reference + centered_mean as f64, std_dev)
    }

    pub fn sample_size(&self) -> u64 {
        self.sample_size
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }
}
