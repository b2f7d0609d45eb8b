use abstat::cli::{Cli, Command, OutputFormat};
use abstat::significance::{
    assess_experiment, compute_significance_with, EffectMagnitude, Experiment, SampleSummary,
    SignificanceConfig, SignificanceResult,
};
use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Print a single comparison in human-readable form
fn print_comparison(control: &SampleSummary, treatment: &SampleSummary, result: &SignificanceResult) {
    println!("=== Significance Test ===");
    println!(
        "Control:   n={} mean={:.4} std_dev={:.4}",
        control.sample_size(),
        control.mean(),
        control.std_dev()
    );
    println!(
        "Treatment: n={} mean={:.4} std_dev={:.4}",
        treatment.sample_size(),
        treatment.mean(),
        treatment.std_dev()
    );
    println!("─────────────────────────────────────────");
    println!("t-statistic:        {:.4}", result.t_statistic);
    println!("p-value:            {:.6}", result.p_value);
    println!("Degrees of freedom: {}", result.degrees_of_freedom);
    println!(
        "Effect size (d):    {:.4} ({})",
        result.effect_size,
        EffectMagnitude::from_effect_size(result.effect_size)
    );
    println!(
        "Significant:        {} ({}% confidence)",
        if result.is_significant { "yes" } else { "no" },
        result.confidence * 100.0
    );
}

fn run_compare(
    control: SampleSummary,
    treatment: SampleSummary,
    config: &SignificanceConfig,
    format: OutputFormat,
) -> Result<()> {
    let result = compute_significance_with(&control, &treatment, config)
        .context("Failed to compute significance")?;

    match format {
        OutputFormat::Text => print_comparison(&control, &treatment, &result),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    Ok(())
}

fn run_assess(
    experiment: &Experiment,
    config: &SignificanceConfig,
    format: OutputFormat,
) -> Result<()> {
    let assessment =
        assess_experiment(experiment, config).context("Failed to assess experiment")?;

    match format {
        OutputFormat::Text => {
            if let Some(name) = &experiment.name {
                println!("Experiment: {}", name);
            }
            print!("{}", assessment.to_report_string());
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&assessment)?),
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.debug);

    match args.command {
        Command::Compare {
            control,
            treatment,
            confidence,
            method,
        } => {
            let config = SignificanceConfig::default()
                .with_confidence_level(confidence)
                .with_p_value_method(method.into());
            run_compare(control, treatment, &config, args.format)
        }
        Command::Assess {
            experiment,
            config,
            confidence,
        } => {
            let mut significance_config = match config {
                Some(path) => SignificanceConfig::from_file(&path)?,
                None => SignificanceConfig::default(),
            };
            if let Some(level) = confidence {
                significance_config = significance_config.with_confidence_level(level);
            }

            let experiment = Experiment::from_file(&experiment)?;
            tracing::debug!(variants = experiment.variants.len(), "loaded experiment");
            run_assess(&experiment, &significance_config, args.format)
        }
    }
}
