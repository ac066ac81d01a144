use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_SAMPLE_FPS;
use crate::detection::TrackingConfig;
use crate::error::{Result, UmbraError};
use crate::profile::sampling::check_compression;
use crate::profile::{ChannelConfig, PolarConfig};
use crate::series::SeriesSelection;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// SER file or directory of frames.
    pub input: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Frames per second of the clip to analyze.
    #[serde(default = "default_sample_fps")]
    pub sample_fps: f64,
    /// Overrides the source's native frame rate.
    #[serde(default)]
    pub source_frame_rate: Option<f64>,
    #[serde(default)]
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub channels: ChannelConfig,
    #[serde(default)]
    pub polar: PolarConfig,
    #[serde(default)]
    pub series: SeriesSelection,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_sample_fps() -> f64 {
    DEFAULT_SAMPLE_FPS
}

impl AnalysisConfig {
    /// Default settings for one input.
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            output_dir: default_output_dir(),
            sample_fps: DEFAULT_SAMPLE_FPS,
            source_frame_rate: None,
            tracking: TrackingConfig::default(),
            channels: ChannelConfig::default(),
            polar: PolarConfig::default(),
            series: SeriesSelection::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.sample_fps.is_finite() || self.sample_fps <= 0.0 {
            return Err(UmbraError::InvalidParameter(format!(
                "sample_fps must be positive, got {}",
                self.sample_fps
            )));
        }
        if let Some(rate) = self.source_frame_rate {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(UmbraError::InvalidParameter(format!(
                    "source_frame_rate must be positive, got {rate}"
                )));
            }
        }
        self.tracking.hough.validate()?;
        check_compression(self.channels.compress)?;
        self.polar.validate()
    }

    /// Base name used in output file names.
    pub fn output_stem(&self) -> String {
        self.input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("clip")
            .to_string()
    }
}
