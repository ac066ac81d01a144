use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use umbra_core::detection::{CirclePick, TrackingConfig};
use umbra_core::frame::CircleEstimate;
use umbra_core::pipeline::config::AnalysisConfig;
use umbra_core::pipeline::run_analysis_reported;
use umbra_core::series::SeriesSelection;

use super::progress::BarReporter;
use crate::summary::{print_analysis_summary, print_tracking_report};

#[derive(Clone, Copy, ValueEnum)]
pub enum PickArg {
    Last,
    Strongest,
    Largest,
}

impl From<PickArg> for CirclePick {
    fn from(arg: PickArg) -> Self {
        match arg {
            PickArg::Last => CirclePick::Last,
            PickArg::Strongest => CirclePick::Strongest,
            PickArg::Largest => CirclePick::Largest,
        }
    }
}

/// Source and detector options shared by `track` and `analyze`.
#[derive(Args)]
pub struct TrackingArgs {
    /// Input SER file or directory of frames
    pub input: PathBuf,

    /// Directory for the output tables
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Frames per second to sample from the clip
    #[arg(long, default_value = "1.0")]
    pub fps: f64,

    /// Override the source frame rate (frames per second)
    #[arg(long)]
    pub frame_rate: Option<f64>,

    /// Hough accumulator threshold
    #[arg(long, default_value = "73")]
    pub accumulator: u32,

    /// Upper Canny edge threshold
    #[arg(long, default_value = "30")]
    pub canny: f32,

    /// Minimum distance between detected centers, in pixels
    #[arg(long, default_value = "1000")]
    pub min_dist: f32,

    /// Smallest disk radius to search for (0 = no limit)
    #[arg(long, default_value = "0")]
    pub min_radius: u32,

    /// Largest disk radius to search for (0 = no limit)
    #[arg(long, default_value = "0")]
    pub max_radius: u32,

    /// Which circle to keep when several are detected
    #[arg(long, value_enum, default_value = "last")]
    pub pick: PickArg,

    /// Estimate used until the first detection, as X,Y,R
    #[arg(long)]
    pub default_circle: Option<String>,
}

impl TrackingArgs {
    pub fn to_config(&self) -> Result<AnalysisConfig> {
        let mut tracking = TrackingConfig::default();
        tracking.hough.accumulator_threshold = self.accumulator;
        tracking.hough.canny_threshold = self.canny;
        tracking.hough.min_dist = self.min_dist;
        tracking.hough.min_radius = self.min_radius;
        tracking.hough.max_radius = self.max_radius;
        tracking.pick = self.pick.into();
        if let Some(ref s) = self.default_circle {
            tracking.default_circle = parse_circle(s)?;
        }

        let mut config = AnalysisConfig::new(self.input.clone());
        config.output_dir = self.output_dir.clone();
        config.sample_fps = self.fps;
        config.source_frame_rate = self.frame_rate;
        config.tracking = tracking;
        Ok(config)
    }
}

fn parse_circle(s: &str) -> Result<CircleEstimate> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, r] = parts.as_slice() else {
        anyhow::bail!("expected X,Y,R, got '{s}'");
    };
    Ok(CircleEstimate::new(
        x.parse().with_context(|| format!("invalid x '{x}'"))?,
        y.parse().with_context(|| format!("invalid y '{y}'"))?,
        r.parse().with_context(|| format!("invalid radius '{r}'"))?,
    ))
}

#[derive(Args)]
pub struct TrackArgs {
    #[command(flatten)]
    pub tracking: TrackingArgs,
}

pub fn run(args: &TrackArgs) -> Result<()> {
    let mut config = args.tracking.to_config()?;
    config.series = SeriesSelection::none();
    config.validate()?;

    print_analysis_summary(&config);

    let reporter = Arc::new(BarReporter::new());
    let output = run_analysis_reported(&config, reporter.clone())?;
    reporter.finish();

    print_tracking_report(&output);
    Ok(())
}
