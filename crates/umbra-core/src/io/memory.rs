use std::path::PathBuf;

use crate::error::{Result, UmbraError};
use crate::frame::{ColorMode, RgbFrame, SourceInfo};

use super::source::FrameSource;

/// Frames already decoded into memory, e.g. by an external video decoder.
pub struct FrameBuffer {
    frames: Vec<RgbFrame>,
    info: SourceInfo,
}

impl FrameBuffer {
    /// All frames must share the dimensions of the first one.
    pub fn new(frames: Vec<RgbFrame>, frame_rate: f64) -> Result<Self> {
        let first = frames.first().ok_or(UmbraError::EmptySequence)?;
        let (w, h) = (first.width(), first.height());
        if let Some(bad) = frames.iter().find(|f| f.width() != w || f.height() != h) {
            return Err(UmbraError::InvalidDimensions {
                width: bad.width() as u32,
                height: bad.height() as u32,
            });
        }

        let frames = frames
            .into_iter()
            .enumerate()
            .map(|(i, f)| f.with_index(i))
            .collect::<Vec<_>>();

        let info = SourceInfo {
            filename: PathBuf::from("<memory>"),
            total_frames: frames.len(),
            width: w as u32,
            height: h as u32,
            bit_depth: 8,
            color_mode: ColorMode::RGB,
            frame_rate,
            observer: None,
            telescope: None,
            instrument: None,
        };
        Ok(Self { frames, info })
    }
}

impl FrameSource for FrameBuffer {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn frame_at(&self, index: usize) -> Result<RgbFrame> {
        self.frames
            .get(index)
            .cloned()
            .ok_or(UmbraError::FrameIndexOutOfRange {
                index,
                total: self.frames.len(),
            })
    }
}
