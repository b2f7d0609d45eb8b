// Two-sample significance estimator
//
// Pooled-variance Student's t-test over summary statistics:
//
//   s_p = sqrt(((n1-1)*s1² + (n2-1)*s2²) / (n1+n2-2))
//   t   = (m2 - m1) / (s_p * sqrt(1/n1 + 1/n2))
//   d   = (m2 - m1) / s_p                          (Cohen's d)
//
// p-values come from statrs' Student's t distribution by default. The
// approximate path (normal CDF, adjusted for small df) is selectable through
// `PValueMethod::Approximate`.

use crate::significance::config::{PValueMethod, SignificanceConfig};
use crate::significance::error::{Result, SignificanceError};
use crate::significance::summary::SampleSummary;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

/// Above this many degrees of freedom the approximate method uses the
/// standard normal directly.
const NORMAL_APPROXIMATION_MIN_DF: u64 = 30;

/// Outcome of comparing a treatment against a control
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignificanceResult {
    /// Pooled two-sample t-statistic (positive when treatment mean is higher)
    pub t_statistic: f64,

    /// Two-tailed p-value in [0, 1]
    pub p_value: f64,

    /// `n1 + n2 - 2`
    pub degrees_of_freedom: u64,

    /// Cohen's d
    pub effect_size: f64,

    /// `p_value < 1 - confidence`
    pub is_significant: bool,

    /// Confidence level the decision was made at
    pub confidence: f64,
}

/// Decide whether `treatment` differs significantly from `control`
///
/// Uses exact Student's t p-values. See [`compute_significance_with`] for
/// the configurable variant.
///
/// # Errors
/// - [`SignificanceError::InvalidSample`] if either sample has fewer than 2
///   observations
/// - [`SignificanceError::ZeroVariance`] if both samples have zero spread
/// - [`SignificanceError::InvalidConfidence`] unless `0 < confidence_level < 1`
///
/// # Example
/// ```
/// use abstat::significance::{compute_significance, SampleSummary};
///
/// let control = SampleSummary::new(100, 75.0, 10.0).unwrap();
/// let treatment = SampleSummary::new(100, 85.0, 10.0).unwrap();
///
/// let result = compute_significance(&control, &treatment, 0.95).unwrap();
/// assert!(result.is_significant);
/// assert_eq!(result.degrees_of_freedom, 198);
/// assert!((result.effect_size - 1.0).abs() < 1e-9);
/// ```
pub fn compute_significance(
    control: &SampleSummary,
    treatment: &SampleSummary,
    confidence_level: f64,
) -> Result<SignificanceResult> {
    estimate(control, treatment, confidence_level, PValueMethod::Exact)
}

/// [`compute_significance`] using the confidence level and p-value method
/// from `config`
pub fn compute_significance_with(
    control: &SampleSummary,
    treatment: &SampleSummary,
    config: &SignificanceConfig,
) -> Result<SignificanceResult> {
    estimate(
        control,
        treatment,
        config.confidence_level,
        config.p_value_method,
    )
}

fn estimate(
    control: &SampleSummary,
    treatment: &SampleSummary,
    confidence_level: f64,
    method: PValueMethod,
) -> Result<SignificanceResult> {
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(SignificanceError::InvalidConfidence(confidence_level));
    }

    let pooled_std = pooled_std_dev(control, treatment)?;
    let df = degrees_of_freedom(control, treatment)?;

    let n1 = control.sample_size() as f64;
    let n2 = treatment.sample_size() as f64;
    let mean_difference = treatment.mean() - control.mean();
    if !mean_difference.is_finite() {
        return Err(SignificanceError::invalid_sample(format!(
            "mean difference overflows ({} - {})",
            treatment.mean(),
            control.mean()
        )));
    }

    let standard_error = pooled_std * (1.0 / n1 + 1.0 / n2).sqrt();
    let t_statistic = mean_difference / standard_error;
    let effect_size = mean_difference / pooled_std;
    if !t_statistic.is_finite() || !effect_size.is_finite() {
        return Err(SignificanceError::invalid_sample(format!(
            "t-statistic or effect size is not finite (difference {}, pooled std {})",
            mean_difference, pooled_std
        )));
    }
    let p_value = two_tailed_p_value(t_statistic, df, method)?;
    let is_significant = p_value < 1.0 - confidence_level;

    tracing::debug!(
        pooled_std,
        t_statistic,
        p_value,
        df,
        effect_size,
        is_significant,
        "computed significance"
    );

    Ok(SignificanceResult {
        t_statistic,
        p_value,
        degrees_of_freedom: df,
        effect_size,
        is_significant,
        confidence: confidence_level,
    })
}

/// Pooled standard deviation of two samples (equal population variance)
///
/// # Errors
/// [`SignificanceError::InvalidSample`] for samples smaller than 2 or a
/// non-finite result, [`SignificanceError::ZeroVariance`] when both samples
/// have zero spread.
pub fn pooled_std_dev(control: &SampleSummary, treatment: &SampleSummary) -> Result<f64> {
    require_comparable("control", control)?;
    require_comparable("treatment", treatment)?;

    let n1 = control.sample_size() as f64;
    let n2 = treatment.sample_size() as f64;

    // Pool (s / scale)² so squaring cannot overflow or underflow
    let scale = control.std_dev().max(treatment.std_dev());
    if scale == 0.0 {
        return Err(SignificanceError::ZeroVariance);
    }

    let r1 = control.std_dev() / scale;
    let r2 = treatment.std_dev() / scale;
    let pooled_ratio = ((n1 - 1.0) * r1 * r1 + (n2 - 1.0) * r2 * r2) / (n1 + n2 - 2.0);
    let pooled_std = scale * pooled_ratio.sqrt();

    if !pooled_std.is_finite() {
        return Err(SignificanceError::invalid_sample(format!(
            "pooled standard deviation is not finite (scale {})",
            scale
        )));
    }

    Ok(pooled_std)
}

/// `n1 + n2 - 2`
pub fn degrees_of_freedom(control: &SampleSummary, treatment: &SampleSummary) -> Result<u64> {
    require_comparable("control", control)?;
    require_comparable("treatment", treatment)?;

    control
        .sample_size()
        .checked_add(treatment.sample_size())
        .map(|total| total - 2)
        .ok_or_else(|| SignificanceError::invalid_sample("combined sample size overflows"))
}

/// Two-tailed p-value for a t-statistic with `df` degrees of freedom
///
/// Always within [0, 1]. An infinite statistic yields 0.
pub fn two_tailed_p_value(t_statistic: f64, df: u64, method: PValueMethod) -> Result<f64> {
    if t_statistic.is_nan() {
        return Err(SignificanceError::invalid_sample("t-statistic is NaN"));
    }
    if df == 0 {
        return Err(SignificanceError::invalid_sample(
            "degrees of freedom must be > 0",
        ));
    }

    let magnitude = t_statistic.abs();
    let tail = match method {
        PValueMethod::Exact => students_t(df)?.sf(magnitude),
        PValueMethod::Approximate if df > NORMAL_APPROXIMATION_MIN_DF => {
            standard_normal()?.sf(magnitude)
        }
        PValueMethod::Approximate => {
            // Adjusted normal deviate for small samples
            let df = df as f64;
            let z = magnitude * (1.0 - 1.0 / (4.0 * df))
                / (1.0 + magnitude * magnitude / (2.0 * df)).sqrt();
            standard_normal()?.sf(z)
        }
    };

    Ok((2.0 * tail).clamp(0.0, 1.0))
}

/// Two-sided critical t value for `confidence_level` at `df` degrees of freedom
///
/// e.g. `critical_t_value(0.95, 198)` ≈ 1.972.
pub fn critical_t_value(confidence_level: f64, df: u64) -> Result<f64> {
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(SignificanceError::InvalidConfidence(confidence_level));
    }
    if df == 0 {
        return Err(SignificanceError::invalid_sample(
            "degrees of freedom must be > 0",
        ));
    }

    let upper_quantile = 1.0 - (1.0 - confidence_level) / 2.0;
    Ok(students_t(df)?.inverse_cdf(upper_quantile))
}

fn require_comparable(label: &str, summary: &SampleSummary) -> Result<()> {
    if summary.sample_size() < 2 {
        return Err(SignificanceError::invalid_sample(format!(
            "{} sample_size must be >= 2 for t-test, got {}",
            label,
            summary.sample_size()
        )));
    }
    Ok(())
}

fn students_t(df: u64) -> Result<StudentsT> {
    StudentsT::new(0.0, 1.0, df as f64)
        .map_err(|e| SignificanceError::Distribution(format!("Student's t (df={}): {}", df, e)))
}

fn standard_normal() -> Result<Normal> {
    Normal::new(0.0, 1.0)
        .map_err(|e| SignificanceError::Distribution(format!("standard normal: {}", e)))
}
