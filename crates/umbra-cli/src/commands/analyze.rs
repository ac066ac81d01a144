use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tracing::debug;
use umbra_core::pipeline::config::AnalysisConfig;
use umbra_core::pipeline::run_analysis_reported;
use umbra_core::profile::{BoundaryPolicy, SamplingStrategy};

use super::progress::BarReporter;
use super::track::TrackingArgs;
use crate::summary::{print_analysis_summary, print_tracking_report};

#[derive(Clone, Copy, ValueEnum)]
pub enum BoundaryArg {
    Clamp,
    Fail,
    Wrap,
}

impl From<BoundaryArg> for BoundaryPolicy {
    fn from(arg: BoundaryArg) -> Self {
        match arg {
            BoundaryArg::Clamp => BoundaryPolicy::Clamp,
            BoundaryArg::Fail => BoundaryPolicy::Fail,
            BoundaryArg::Wrap => BoundaryPolicy::Wrap,
        }
    }
}

#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub tracking: TrackingArgs,

    /// Analysis config file (TOML); replaces all other options
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Keep one row/column per N
    #[arg(long, default_value = "1")]
    pub compress: usize,

    /// Keep one angle per N degrees
    #[arg(long, default_value = "1")]
    pub angular_compress: usize,

    /// Keep one radius per N pixels
    #[arg(long, default_value = "1")]
    pub radial_compress: usize,

    /// Average each group of N samples instead of keeping the first
    #[arg(long)]
    pub block_average: bool,

    /// Fixed sweep radius for polar profiles (default: disk radius + 100)
    #[arg(long)]
    pub sweep_radius: Option<u32>,

    /// How to sample rays that leave the frame
    #[arg(long, value_enum, default_value = "clamp")]
    pub boundary: BoundaryArg,
}

pub fn run(args: &AnalyzeArgs) -> Result<()> {
    let config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str(&contents).context("Invalid analysis config")?
    } else {
        build_config_from_args(args)?
    };
    config.validate()?;
    debug!(?config, "Analysis config");

    print_analysis_summary(&config);

    let reporter = Arc::new(BarReporter::new());
    let output = run_analysis_reported(&config, reporter.clone())?;
    reporter.finish();

    print_tracking_report(&output);
    Ok(())
}

fn build_config_from_args(args: &AnalyzeArgs) -> Result<AnalysisConfig> {
    let mut config = args.tracking.to_config()?;
    let strategy = if args.block_average {
        SamplingStrategy::BlockAverage
    } else {
        SamplingStrategy::Stride
    };

    config.channels.compress = args.compress;
    config.channels.strategy = strategy;
    config.polar.angular_compress = args.angular_compress;
    config.polar.radial_compress = args.radial_compress;
    config.polar.strategy = strategy;
    config.polar.max_radius = args.sweep_radius;
    config.polar.boundary = args.boundary.into();
    Ok(config)
}
