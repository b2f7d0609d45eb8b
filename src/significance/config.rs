// Configuration for significance estimation
//
// Thresholds are explicit parameters passed into the estimator, never
// global state.

use crate::significance::error::{Result, SignificanceError};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How the two-tailed p-value is derived from the t-statistic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PValueMethod {
    /// Student's t CDF with `n1 + n2 - 2` degrees of freedom
    #[default]
    Exact,

    /// Normal CDF for df > 30, adjusted-normal closed form for small samples.
    ///
    /// Cheaper but less accurate for small samples; kept for comparison with
    /// historical dashboards that reported approximate p-values.
    Approximate,
}

/// Configuration for significance estimation
///
/// # Example
/// ```
/// use abstat::significance::SignificanceConfig;
///
/// let config = SignificanceConfig::default();
/// assert_eq!(config.confidence_level, 0.95);
/// assert!((config.significance_level() - 0.05).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignificanceConfig {
    /// Confidence level for the significance decision
    ///
    /// A comparison is significant when `p_value < 1 - confidence_level`.
    /// - 0.95 (default): 5% false positive rate
    /// - 0.99: stricter, fewer false positives
    /// - 0.90: looser, catches smaller effects earlier
    pub confidence_level: f64,

    /// p-value derivation (exact Student's t by default)
    pub p_value_method: PValueMethod,

    /// Minimum observations per variant before an experiment comparison runs
    ///
    /// A pooled t-test needs at least 2 observations per sample.
    pub min_sample_size: u64,
}

impl Default for SignificanceConfig {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
            p_value_method: PValueMethod::Exact,
            min_sample_size: 2,
        }
    }
}

impl SignificanceConfig {
    /// Strict configuration: 99% confidence and at least 30 observations
    pub fn strict() -> Self {
        Self {
            confidence_level: 0.99,
            p_value_method: PValueMethod::Exact,
            min_sample_size: 30,
        }
    }

    /// Permissive configuration: 90% confidence
    ///
    /// Use when early signals matter more than false positives.
    pub fn permissive() -> Self {
        Self {
            confidence_level: 0.90,
            p_value_method: PValueMethod::Exact,
            min_sample_size: 2,
        }
    }

    /// Builder-style override of the confidence level
    pub fn with_confidence_level(mut self, confidence_level: f64) -> Self {
        self.confidence_level = confidence_level;
        self
    }

    /// Builder-style override of the p-value method
    pub fn with_p_value_method(mut self, method: PValueMethod) -> Self {
        self.p_value_method = method;
        self
    }

    /// Significance level (alpha) implied by the confidence level
    pub fn significance_level(&self) -> f64 {
        1.0 - self.confidence_level
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(SignificanceError::InvalidConfig(format!(
                "confidence_level must be in (0, 1), got {}",
                self.confidence_level
            )));
        }

        if self.min_sample_size < 2 {
            return Err(SignificanceError::InvalidConfig(format!(
                "min_sample_size must be >= 2 for t-test, got {}",
                self.min_sample_size
            )));
        }

        Ok(())
    }

    /// Load configuration from a TOML string
    ///
    /// Missing keys fall back to [`SignificanceConfig::default`].
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }
}
