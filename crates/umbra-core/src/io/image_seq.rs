use std::path::{Path, PathBuf};

use ndarray::Array3;

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{Result, UmbraError};
use crate::frame::{ColorMode, FrameMetadata, RgbFrame, SourceInfo};

use super::source::FrameSource;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp"];

/// A directory of still images treated as consecutive video frames.
///
/// Files are ordered by name, so zero-padded numbering is expected
/// (`frame_0001.png`, `frame_0002.png`, ...).
pub struct ImageSequence {
    paths: Vec<PathBuf>,
    info: SourceInfo,
}

impl ImageSequence {
    pub fn open(dir: &Path, frame_rate: f64) -> Result<Self> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && has_image_extension(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        let first = paths.first().ok_or(UmbraError::EmptySequence)?;
        let (width, height) = image::image_dimensions(first)?;

        let info = SourceInfo {
            filename: dir.to_path_buf(),
            total_frames: paths.len(),
            width,
            height,
            bit_depth: 8,
            color_mode: ColorMode::RGB,
            frame_rate,
            observer: None,
            telescope: None,
            instrument: None,
        };
        Ok(Self { paths, info })
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl FrameSource for ImageSequence {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn frame_at(&self, index: usize) -> Result<RgbFrame> {
        let path = self
            .paths
            .get(index)
            .ok_or(UmbraError::FrameIndexOutOfRange {
                index,
                total: self.paths.len(),
            })?;

        let rgb = image::open(path)?.to_rgb8();
        let (w, h) = rgb.dimensions();
        if w != self.info.width || h != self.info.height {
            return Err(UmbraError::InvalidDimensions {
                width: w,
                height: h,
            });
        }

        let data = Array3::from_shape_vec(
            (h as usize, w as usize, COLOR_CHANNEL_COUNT),
            rgb.into_raw(),
        )
        .map_err(|_| UmbraError::InvalidDimensions {
            width: w,
            height: h,
        })?;

        let mut frame = RgbFrame::new(data)?;
        frame.metadata = FrameMetadata {
            frame_index: index,
            timestamp_us: None,
        };
        Ok(frame)
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
