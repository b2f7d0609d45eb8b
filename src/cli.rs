//! CLI argument parsing for abstat

use crate::significance::{PValueMethod, SampleSummary};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

/// p-value method selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    /// Student's t CDF
    Exact,
    /// Normal approximation (adjusted for small samples)
    Approximate,
}

impl From<MethodArg> for PValueMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Exact => PValueMethod::Exact,
            MethodArg::Approximate => PValueMethod::Approximate,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "abstat")]
#[command(version)]
#[command(about = "Statistical significance for A/B experiments", long_about = None)]
pub struct Cli {
    /// Enable debug tracing on stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compare a treatment against a control given N,MEAN,STDDEV summaries
    Compare {
        /// Control summary (e.g., --control 100,75,10)
        #[arg(long, value_name = "N,MEAN,STDDEV", value_parser = parse_summary)]
        control: SampleSummary,

        /// Treatment summary (e.g., --treatment 100,85,10)
        #[arg(long, value_name = "N,MEAN,STDDEV", value_parser = parse_summary)]
        treatment: SampleSummary,

        /// Confidence level for the significance decision
        #[arg(long, value_name = "LEVEL", default_value = "0.95")]
        confidence: f64,

        /// p-value method
        #[arg(long, value_enum, default_value = "exact")]
        method: MethodArg,
    },

    /// Assess every variant of an experiment JSON file against its control
    Assess {
        /// Experiment file ({"control": {...}, "variants": {"name": {...}}})
        #[arg(value_name = "EXPERIMENT")]
        experiment: PathBuf,

        /// TOML configuration file (confidence_level, p_value_method, min_sample_size)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Override the configured confidence level
        #[arg(long, value_name = "LEVEL")]
        confidence: Option<f64>,
    },
}

/// Parse `N,MEAN,STDDEV` into a validated summary
pub fn parse_summary(s: &str) -> Result<SampleSummary, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [n, mean, std_dev] = parts.as_slice() else {
        return Err(format!("expected N,MEAN,STDDEV, got '{}'", s));
    };

    let n: u64 = n
        .parse()
        .map_err(|e| format!("invalid sample size '{}': {}", n, e))?;
    let mean: f64 = mean
        .parse()
        .map_err(|e| format!("invalid mean '{}': {}", mean, e))?;
    let std_dev: f64 = std_dev
        .parse()
        .map_err(|e| format!("invalid standard deviation '{}': {}", std_dev, e))?;

    SampleSummary::new(n, mean, std_dev).map_err(|e| e.to_string())
}
