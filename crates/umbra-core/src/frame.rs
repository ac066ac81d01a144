use ndarray::{Array2, Array3, ArrayView2};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::consts::{COLOR_CHANNEL_COUNT, LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};
use crate::error::{Result, UmbraError};

/// A single decoded video frame with 8-bit RGB pixels.
#[derive(Clone, Debug)]
pub struct RgbFrame {
    /// Pixel data, shape = (height, width, 3), channel order R, G, B.
    pub data: Array3<u8>,
    pub metadata: FrameMetadata,
}

impl RgbFrame {
    /// Wrap an RGB array. The last axis must hold exactly three channels.
    pub fn new(data: Array3<u8>) -> Result<Self> {
        let (h, w, c) = data.dim();
        if c != COLOR_CHANNEL_COUNT || h == 0 || w == 0 {
            return Err(UmbraError::InvalidDimensions {
                width: w as u32,
                height: h as u32,
            });
        }
        Ok(Self {
            data,
            metadata: FrameMetadata::default(),
        })
    }

    /// Build an RGB frame by replicating a grayscale plane into all channels.
    pub fn from_gray(gray: ArrayView2<u8>) -> Result<Self> {
        let (h, w) = gray.dim();
        let data = Array3::from_shape_fn((h, w, COLOR_CHANNEL_COUNT), |(r, c, _)| gray[[r, c]]);
        Self::new(data)
    }

    /// A frame filled with one color.
    pub fn solid(width: usize, height: usize, rgb: [u8; 3]) -> Result<Self> {
        let data = Array3::from_shape_fn((height, width, COLOR_CHANNEL_COUNT), |(_, _, ch)| rgb[ch]);
        Self::new(data)
    }

    pub fn with_index(mut self, frame_index: usize) -> Self {
        self.metadata.frame_index = frame_index;
        self
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// Mean of the three channels at one pixel.
    #[inline]
    pub fn intensity(&self, row: usize, col: usize) -> f64 {
        let sum = self.data[[row, col, 0]] as u32
            + self.data[[row, col, 1]] as u32
            + self.data[[row, col, 2]] as u32;
        sum as f64 / COLOR_CHANNEL_COUNT as f64
    }

    /// Luminance plane in the 0..=255 range, ITU-R BT.601 weights.
    pub fn to_gray(&self) -> Array2<f32> {
        let (h, w, _) = self.data.dim();
        Array2::from_shape_fn((h, w), |(row, col)| {
            LUMINANCE_R * self.data[[row, col, 0]] as f32
                + LUMINANCE_G * self.data[[row, col, 1]] as f32
                + LUMINANCE_B * self.data[[row, col, 2]] as f32
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct FrameMetadata {
    /// Index of the frame in the source (not in the sampled sequence).
    pub frame_index: usize,
    pub timestamp_us: Option<u64>,
}

/// Position and size of the eclipse disk in one frame, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircleEstimate {
    pub x: i32,
    pub y: i32,
    pub radius: u32,
}

impl CircleEstimate {
    pub const fn new(x: i32, y: i32, radius: u32) -> Self {
        Self { x, y, radius }
    }
}

/// Color layout of the source data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ColorMode {
    Mono,
    BayerRGGB,
    BayerGRBG,
    BayerGBRG,
    BayerBGGR,
    RGB,
    BGR,
}

/// Metadata about a frame source.
#[derive(Clone, Debug)]
pub struct SourceInfo {
    pub filename: PathBuf,
    pub total_frames: usize,
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_mode: ColorMode,
    /// Native frames per second of the recording.
    pub frame_rate: f64,
    pub observer: Option<String>,
    pub telescope: Option<String>,
    pub instrument: Option<String>,
}

impl SourceInfo {
    /// Clip length in seconds.
    pub fn duration(&self) -> f64 {
        if self.frame_rate > 0.0 {
            self.total_frames as f64 / self.frame_rate
        } else {
            0.0
        }
    }
}
