// Statistical significance estimation for A/B experiments
//
// Compares a treatment variant against a control using a pooled two-sample
// t-test over summary statistics (n, mean, std_dev), reports Cohen's d as the
// effect size and decides significance against an explicit confidence level.
//
// Implementation:
// - Uses statrs (crates.io) for the Student's t and normal distributions
//   (exact p-values and critical values)
// - Uses trueno (crates.io) for SIMD-optimized summaries of raw observations
// - Pure functions: configuration is passed in, nothing is global

mod config;
mod error;
mod estimator;
mod experiment;
mod summary;

pub use config::{PValueMethod, SignificanceConfig};
pub use error::{Result, SignificanceError};
pub use estimator::{
    compute_significance, compute_significance_with, critical_t_value, degrees_of_freedom,
    pooled_std_dev, two_tailed_p_value, SignificanceResult,
};
pub use experiment::{
    assess_experiment, EffectMagnitude, Experiment, ExperimentAssessment, ExperimentVerdict,
    VariantComparison,
};
pub use summary::SampleSummary;

#[cfg(test)]
mod tests;
