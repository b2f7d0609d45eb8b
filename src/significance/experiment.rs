// Experiment assessment: one control against one or more variants
//
// Runs the estimator per variant and folds the comparisons into a single
// verdict. Variants that cannot be estimated are skipped and reported, never
// silently dropped.

use crate::significance::config::SignificanceConfig;
use crate::significance::error::Result;
use crate::significance::estimator::{
    compute_significance_with, critical_t_value, pooled_std_dev, SignificanceResult,
};
use crate::significance::summary::SampleSummary;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// A control summary and the variants tested against it
///
/// # Example
/// ```
/// use abstat::significance::Experiment;
///
/// let experiment: Experiment = serde_json::from_str(r#"{
///     "name": "hero-headline",
///     "control": {"sampleSize": 100, "mean": 75.0, "stdDev": 10.0},
///     "variants": {
///         "b": {"sampleSize": 100, "mean": 85.0, "stdDev": 10.0}
///     }
/// }"#).unwrap();
/// assert_eq!(experiment.variants.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub control: SampleSummary,
    pub variants: BTreeMap<String, SampleSummary>,
}

impl Experiment {
    pub fn new(control: SampleSummary) -> Self {
        Self {
            name: None,
            control,
            variants: BTreeMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_variant(mut self, name: impl Into<String>, summary: SampleSummary) -> Self {
        self.variants.insert(name.into(), summary);
        self
    }

    /// Load an experiment from JSON
    pub fn from_json_str(content: &str) -> anyhow::Result<Self> {
        serde_json::from_str(content).context("Failed to parse experiment JSON")
    }

    /// Load an experiment from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_json_str(&content)
            .with_context(|| format!("Invalid experiment in {}", path.display()))
    }
}

/// Cohen's conventional effect size bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectMagnitude {
    Negligible,
    Small,
    Medium,
    Large,
}

impl EffectMagnitude {
    /// |d| < 0.2 negligible, < 0.5 small, < 0.8 medium, otherwise large
    pub fn from_effect_size(effect_size: f64) -> Self {
        let d = effect_size.abs();
        if d < 0.2 {
            Self::Negligible
        } else if d < 0.5 {
            Self::Small
        } else if d < 0.8 {
            Self::Medium
        } else {
            Self::Large
        }
    }
}

impl std::fmt::Display for EffectMagnitude {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Negligible => "negligible",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        };
        f.write_str(label)
    }
}

/// One variant compared against the control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantComparison {
    pub variant: String,
    pub result: SignificanceResult,
    /// `(m2 - m1) / |m1|`; `None` when the control mean is zero or the lift
    /// is not finite
    pub relative_lift: Option<f64>,
    pub mean_difference: f64,
    /// Confidence interval of `m2 - m1` at the configured confidence level
    pub difference_interval: (f64, f64),
    pub magnitude: EffectMagnitude,
}

impl VariantComparison {
    /// Compare `treatment` against `control`
    pub fn compute(
        variant: impl Into<String>,
        control: &SampleSummary,
        treatment: &SampleSummary,
        config: &SignificanceConfig,
    ) -> Result<Self> {
        let result = compute_significance_with(control, treatment, config)?;
        let pooled_std = pooled_std_dev(control, treatment)?;

        let mean_difference = treatment.mean() - control.mean();
        let standard_error = pooled_std
            * (1.0 / control.sample_size() as f64 + 1.0 / treatment.sample_size() as f64).sqrt();
        let margin =
            critical_t_value(config.confidence_level, result.degrees_of_freedom)? * standard_error;

        let relative_lift = if control.mean() == 0.0 {
            None
        } else {
            Some(mean_difference / control.mean().abs()).filter(|lift| lift.is_finite())
        };

        Ok(Self {
            variant: variant.into(),
            result,
            relative_lift,
            mean_difference,
            difference_interval: (mean_difference - margin, mean_difference + margin),
            magnitude: EffectMagnitude::from_effect_size(result.effect_size),
        })
    }
}

/// Final verdict for an experiment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExperimentVerdict {
    /// No variant differs significantly from control
    NoSignificantDifference,

    /// At least one variant differs significantly
    Significant {
        /// Variants with a significantly higher mean than control
        improved: Vec<String>,
        /// Variants with a significantly lower mean than control
        degraded: Vec<String>,
    },

    /// Not enough data to make a statistical determination
    InsufficientData { reason: String },
}

/// Detailed experiment assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentAssessment {
    pub verdict: ExperimentVerdict,

    /// Comparisons performed, in variant name order
    pub comparisons: Vec<VariantComparison>,

    /// Variants that could not be compared (variant → reason)
    pub skipped: BTreeMap<String, String>,

    /// Configuration used for assessment
    pub config: SignificanceConfig,
}

impl ExperimentAssessment {
    /// Significant improvement with the largest effect size, if any
    pub fn best_variant(&self) -> Option<&VariantComparison> {
        self.comparisons
            .iter()
            .filter(|c| c.result.is_significant && c.mean_difference > 0.0)
            .max_by(|a, b| a.result.effect_size.total_cmp(&b.result.effect_size))
    }

    pub fn comparison(&self, variant: &str) -> Option<&VariantComparison> {
        self.comparisons.iter().find(|c| c.variant == variant)
    }

    /// Plain-text summary for terminal output
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();

        match &self.verdict {
            ExperimentVerdict::NoSignificantDifference => {
                report.push_str("NO SIGNIFICANT DIFFERENCE\n");
            }
            ExperimentVerdict::Significant { improved, degraded } => {
                report.push_str("SIGNIFICANT DIFFERENCE DETECTED\n");
                if !improved.is_empty() {
                    report.push_str(&format!("Improved: {}\n", improved.join(", ")));
                }
                if !degraded.is_empty() {
                    report.push_str(&format!("Degraded: {}\n", degraded.join(", ")));
                }
            }
            ExperimentVerdict::InsufficientData { reason } => {
                report.push_str("INSUFFICIENT DATA\n");
                report.push_str(&format!("Reason: {}\n", reason));
            }
        }

        report.push_str(&format!(
            "Confidence level: {} (alpha={:.4})\n",
            self.config.confidence_level,
            self.config.significance_level()
        ));

        if !self.comparisons.is_empty() {
            report.push_str("\nComparisons:\n");
            for c in &self.comparisons {
                let lift = c
                    .relative_lift
                    .map(|l| format!("{:+.2}%", l * 100.0))
                    .unwrap_or_else(|| "n/a".to_string());
                report.push_str(&format!(
                    "  {} (t={:.3}, p={:.4}, d={:.3} {}, lift={}, diff CI=[{:.3}, {:.3}])\n",
                    c.variant,
                    c.result.t_statistic,
                    c.result.p_value,
                    c.result.effect_size,
                    c.magnitude,
                    lift,
                    c.difference_interval.0,
                    c.difference_interval.1
                ));
            }
        }

        if !self.skipped.is_empty() {
            report.push_str(&format!("\nSkipped variants ({}):\n", self.skipped.len()));
            for (name, reason) in &self.skipped {
                report.push_str(&format!("  - {}: {}\n", name, reason));
            }
        }

        report
    }
}

/// Assess every variant of `experiment` against its control
///
/// # Example
/// ```
/// use abstat::significance::{
///     assess_experiment, Experiment, ExperimentVerdict, SampleSummary, SignificanceConfig,
/// };
///
/// let experiment = Experiment::new(SampleSummary::new(100, 75.0, 10.0).unwrap())
///     .with_variant("b", SampleSummary::new(100, 85.0, 10.0).unwrap());
///
/// let assessment = assess_experiment(&experiment, &SignificanceConfig::default()).unwrap();
/// assert_eq!(
///     assessment.verdict,
///     ExperimentVerdict::Significant { improved: vec!["b".to_string()], degraded: vec![] }
/// );
/// ```
pub fn assess_experiment(
    experiment: &Experiment,
    config: &SignificanceConfig,
) -> Result<ExperimentAssessment> {
    config.validate()?;

    let control = &experiment.control;
    let mut comparisons = Vec::new();
    let mut skipped = BTreeMap::new();

    for (name, variant) in &experiment.variants {
        if control.sample_size() < config.min_sample_size
            || variant.sample_size() < config.min_sample_size
        {
            skipped.insert(
                name.clone(),
                format!(
                    "sample size below minimum {} (control={}, variant={})",
                    config.min_sample_size,
                    control.sample_size(),
                    variant.sample_size()
                ),
            );
            continue;
        }

        match VariantComparison::compute(name.as_str(), control, variant, config) {
            Ok(comparison) => comparisons.push(comparison),
            Err(e) => {
                tracing::warn!("Failed to compare variant {}: {}", name, e);
                skipped.insert(name.clone(), e.to_string());
            }
        }
    }

    let verdict = if comparisons.is_empty() {
        ExperimentVerdict::InsufficientData {
            reason: format!(
                "No variants met sample size and variance requirements \
                 (min_sample_size={}, variants={}, skipped={})",
                config.min_sample_size,
                experiment.variants.len(),
                skipped.len()
            ),
        }
    } else {
        let (improved, degraded): (Vec<_>, Vec<_>) = comparisons
            .iter()
            .filter(|c| c.result.is_significant)
            .partition(|c| c.mean_difference > 0.0);

        if improved.is_empty() && degraded.is_empty() {
            ExperimentVerdict::NoSignificantDifference
        } else {
            ExperimentVerdict::Significant {
                improved: improved.into_iter().map(|c| c.variant.clone()).collect(),
                degraded: degraded.into_iter().map(|c| c.variant.clone()).collect(),
            }
        }
    };

    tracing::debug!(
        experiment = experiment.name.as_deref().unwrap_or("<unnamed>"),
        compared = comparisons.len(),
        skipped = skipped.len(),
        "assessed experiment"
    );

    Ok(ExperimentAssessment {
        verdict,
        comparisons,
        skipped,
        config: config.clone(),
    })
}
