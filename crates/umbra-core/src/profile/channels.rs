use ndarray::Axis;
use serde::{Deserialize, Serialize};

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::Result;
use crate::frame::RgbFrame;

use super::sampling::{axis_groups, group_mean, group_positions, SamplingStrategy};

/// Row/column profile settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Keep one value per `compress` rows/columns (1 = all).
    pub compress: usize,
    pub strategy: SamplingStrategy,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            compress: 1,
            strategy: SamplingStrategy::Stride,
        }
    }
}

/// Position-independent statistics of one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelProfiles {
    /// Mean red, green, blue over all pixels.
    pub mean_rgb: [f64; 3],
    /// Mean intensity of each (selected) row.
    pub rows: Vec<f64>,
    /// Mean intensity of each (selected) column.
    pub cols: Vec<f64>,
}

impl ChannelProfiles {
    pub fn compute(frame: &RgbFrame, config: &ChannelConfig) -> Result<Self> {
        Ok(Self {
            mean_rgb: mean_rgb(frame),
            rows: row_profile(frame, config.compress, config.strategy)?,
            cols: col_profile(frame, config.compress, config.strategy)?,
        })
    }
}

/// Per-channel average over all pixels, in R, G, B order.
pub fn mean_rgb(frame: &RgbFrame) -> [f64; 3] {
    let mut sums = [0u64; COLOR_CHANNEL_COUNT];
    for pixel in frame.data.lanes(Axis(2)) {
        for (sum, &v) in sums.iter_mut().zip(pixel.iter()) {
            *sum += v as u64;
        }
    }
    let n = (frame.width() * frame.height()) as f64;
    sums.map(|s| s as f64 / n)
}

/// Mean intensity (over columns and channels) of each row.
pub fn row_profile(frame: &RgbFrame, compress: usize, strategy: SamplingStrategy) -> Result<Vec<f64>> {
    let per_row = (frame.width() * COLOR_CHANNEL_COUNT) as f64;
    let means: Vec<f64> = frame
        .data
        .axis_iter(Axis(0))
        .map(|row| row.iter().map(|&v| v as u64).sum::<u64>() as f64 / per_row)
        .collect();
    reduce(&means, compress, strategy)
}

/// Mean intensity (over rows and channels) of each column.
pub fn col_profile(frame: &RgbFrame, compress: usize, strategy: SamplingStrategy) -> Result<Vec<f64>> {
    let per_col = (frame.height() * COLOR_CHANNEL_COUNT) as f64;
    let means: Vec<f64> = frame
        .data
        .axis_iter(Axis(1))
        .map(|col| col.iter().map(|&v| v as u64).sum::<u64>() as f64 / per_col)
        .collect();
    reduce(&means, compress, strategy)
}

/// Row indices labelling each value of a row profile of a `height`-row frame.
pub fn row_positions(height: usize, compress: usize, strategy: SamplingStrategy) -> Result<Vec<usize>> {
    Ok(group_positions(&axis_groups(0..height, compress, strategy)?))
}

/// Column indices labelling each value of a column profile.
pub fn col_positions(width: usize, compress: usize, strategy: SamplingStrategy) -> Result<Vec<usize>> {
    Ok(group_positions(&axis_groups(0..width, compress, strategy)?))
}

fn reduce(means: &[f64], compress: usize, strategy: SamplingStrategy) -> Result<Vec<f64>> {
    let groups = axis_groups(0..means.len(), compress, strategy)?;
    Ok(groups
        .into_iter()
        .map(|g| group_mean(g, |i| means[i]))
        .collect())
}
