// Scenario tests for significance estimation
//
// Realistic landing page metrics: time-on-page in seconds, engagement
// scores, conversion values.

use super::*;

fn summary(n: u64, mean: f64, std_dev: f64) -> SampleSummary {
    SampleSummary::new(n, mean, std_dev).unwrap()
}

/// Engagement score lifts from 75 to 85 on 100 visitors per arm
#[test]
fn test_headline_variant_significant() {
    let control = summary(100, 75.0, 10.0);
    let treatment = summary(100, 85.0, 10.0);

    let result = compute_significance(&control, &treatment, 0.95).unwrap();

    assert!(result.is_significant);
    assert!((result.effect_size - 1.0).abs() < 1e-9);
    assert_eq!(result.degrees_of_freedom, 198);
    // t = 10 / (10 * sqrt(0.02)) = 7.071
    assert!((result.t_statistic - 7.0710678).abs() < 1e-6);
    assert!(result.p_value < 1e-9);
    assert_eq!(result.confidence, 0.95);
}

/// Identical arms never produce a significant result
#[test]
fn test_identical_variants_not_significant() {
    let control = summary(100, 75.0, 10.0);
    let treatment = summary(100, 75.0, 10.0);

    let result = compute_significance(&control, &treatment, 0.95).unwrap();

    assert_eq!(result.t_statistic, 0.0);
    assert_eq!(result.effect_size, 0.0);
    assert!(!result.is_significant);
    assert!((result.p_value - 1.0).abs() < 1e-12);
}

#[test]
fn test_single_observation_rejected() {
    let full = summary(100, 75.0, 10.0);
    let single = summary(1, 80.0, 0.0);

    assert!(matches!(
        compute_significance(&single, &full, 0.95),
        Err(SignificanceError::InvalidSample { .. })
    ));
    assert!(matches!(
        compute_significance(&full, &single, 0.95),
        Err(SignificanceError::InvalidSample { .. })
    ));
}

#[test]
fn test_zero_variance_rejected() {
    let control = summary(20, 3.0, 0.0);
    let treatment = summary(20, 4.0, 0.0);

    assert_eq!(
        compute_significance(&control, &treatment, 0.95),
        Err(SignificanceError::ZeroVariance)
    );
}

/// Widening the gap between means strengthens the evidence
#[test]
fn test_larger_difference_is_stronger() {
    let control = summary(40, 100.0, 15.0);
    let mut previous: Option<SignificanceResult> = None;

    for delta in [0.0, 1.0, 2.5, 5.0, 10.0, 20.0] {
        let treatment = summary(40, 100.0 + delta, 15.0);
        let result = compute_significance(&control, &treatment, 0.95).unwrap();

        if let Some(prev) = previous {
            assert!(result.t_statistic.abs() > prev.t_statistic.abs());
            assert!(result.effect_size.abs() > prev.effect_size.abs());
            assert!(result.p_value < prev.p_value);
        }
        previous = Some(result);
    }
}

/// Doubling traffic on both arms turns a marginal result into a significant one
#[test]
fn test_doubling_sample_size_flips_significance() {
    let control = summary(30, 50.0, 10.0);
    let treatment = summary(30, 54.0, 10.0);
    let small = compute_significance(&control, &treatment, 0.95).unwrap();

    let control = summary(60, 50.0, 10.0);
    let treatment = summary(60, 54.0, 10.0);
    let large = compute_significance(&control, &treatment, 0.95).unwrap();

    assert!(large.t_statistic.abs() > small.t_statistic.abs());
    assert!(!small.is_significant, "p = {}", small.p_value);
    assert!(large.is_significant, "p = {}", large.p_value);
}

/// A stricter confidence level never flags more than a looser one
#[test]
fn test_confidence_level_ordering() {
    let control = summary(25, 10.0, 3.0);
    let treatment = summary(25, 11.8, 3.0);

    let loose = compute_significance(&control, &treatment, 0.90).unwrap();
    let default = compute_significance(&control, &treatment, 0.95).unwrap();
    let strict = compute_significance(&control, &treatment, 0.99).unwrap();

    assert_eq!(loose.p_value, strict.p_value);
    assert!(loose.is_significant);
    assert!(default.is_significant);
    assert!(!strict.is_significant, "p = {}", strict.p_value);
}

/// Approximate p-values track exact ones closely once df is large
#[test]
fn test_approximate_matches_exact_for_large_samples() {
    let control = summary(500, 12.0, 4.0);
    let treatment = summary(500, 12.5, 4.0);

    let exact = compute_significance_with(&control, &treatment, &SignificanceConfig::default())
        .unwrap();
    let approx = compute_significance_with(
        &control,
        &treatment,
        &SignificanceConfig::default().with_p_value_method(PValueMethod::Approximate),
    )
    .unwrap();

    assert_eq!(exact.t_statistic, approx.t_statistic);
    assert!((exact.p_value - approx.p_value).abs() < 1e-3);
    assert_eq!(exact.is_significant, approx.is_significant);
}

/// Unbalanced arms: df still n1 + n2 - 2
#[test]
fn test_unbalanced_arms() {
    let control = summary(1000, 0.031, 0.17);
    let treatment = summary(150, 0.045, 0.21);

    let result = compute_significance(&control, &treatment, 0.95).unwrap();
    assert_eq!(result.degrees_of_freedom, 1148);
    assert!(result.t_statistic > 0.0);
    assert!((0.0..=1.0).contains(&result.p_value));
}

/// Raw observations → summary → significance
#[test]
fn test_observations_pipeline() {
    let control: Vec<f64> = vec![10.0, 12.0, 11.0, 13.0, 10.0, 11.0, 12.0, 10.0];
    let treatment: Vec<f64> = vec![25.0, 27.0, 26.0, 28.0, 25.0, 26.0, 27.0, 25.0];

    let control = SampleSummary::from_observations(&control).unwrap();
    let treatment = SampleSummary::from_observations(&treatment).unwrap();

    let result = compute_significance(&control, &treatment, 0.95).unwrap();
    assert!(result.is_significant);
    assert_eq!(result.degrees_of_freedom, 14);
}

/// Millisecond timings with a large common offset keep their spread
#[test]
fn test_observations_with_large_offset() {
    let control: Vec<f64> = (0..5000).map(|i| 1200.0 + (i % 5) as f64).collect();
    let treatment: Vec<f64> = (0..5000).map(|i| 1201.0 + (i % 5) as f64).collect();

    let control = SampleSummary::from_observations(&control).unwrap();
    let treatment = SampleSummary::from_observations(&treatment).unwrap();

    let result = compute_significance(&control, &treatment, 0.95).unwrap();
    // sd = sqrt(2 * 5000 / 4999) ≈ 1.4143, d ≈ 0.7071, t ≈ 35.35
    assert!((result.effect_size - 0.7071).abs() < 1e-3, "d = {}", result.effect_size);
    assert!((result.t_statistic - 35.35).abs() < 0.05, "t = {}", result.t_statistic);
}

/// Multi-variant landing page test with one winner, one loser and one
/// variant that never got enough traffic
#[test]
fn test_multi_variant_experiment() {
    let experiment = Experiment::new(summary(400, 62.0, 18.0))
        .with_name("pricing-page")
        .with_variant("annual-first", summary(410, 66.5, 18.5))
        .with_variant("no-table", summary(395, 58.0, 19.0))
        .with_variant("late-start", summary(1, 70.0, 0.0));

    let assessment = assess_experiment(&experiment, &SignificanceConfig::default()).unwrap();

    assert_eq!(
        assessment.verdict,
        ExperimentVerdict::Significant {
            improved: vec!["annual-first".to_string()],
            degraded: vec!["no-table".to_string()],
        }
    );
    assert_eq!(assessment.best_variant().unwrap().variant, "annual-first");
    assert!(assessment.skipped.contains_key("late-start"));
}
