//! abstat - Statistical significance estimation for A/B experiments
//!
//! This library compares a treatment variant against a control from summary
//! statistics (sample size, mean, standard deviation): pooled two-sample
//! t-statistic, exact Student's t p-value, Cohen's d effect size and a
//! significance decision at an explicit confidence level.

pub mod cli;
pub mod significance;
