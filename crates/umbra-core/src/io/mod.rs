pub mod image_seq;
pub mod memory;
pub mod ser;
pub mod source;
pub mod table;

use std::path::Path;

use crate::consts::DEFAULT_SOURCE_FRAME_RATE;
use crate::error::{Result, UmbraError};

pub use source::{sample_indices, FrameSource, SampledFrames};

/// Open a SER file or an image directory as a frame source.
///
/// `frame_rate` overrides the native rate (SER timestamps) or sets it for
/// image sequences, which carry no timing of their own.
pub fn open_source(path: &Path, frame_rate: Option<f64>) -> Result<Box<dyn FrameSource>> {
    if path.is_dir() {
        let rate = frame_rate.unwrap_or(DEFAULT_SOURCE_FRAME_RATE);
        return Ok(Box::new(image_seq::ImageSequence::open(path, rate)?));
    }

    match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase) {
        Some(ext) if ext == "ser" => Ok(Box::new(ser::SerReader::open_with_frame_rate(
            path, frame_rate,
        )?)),
        _ => Err(UmbraError::InvalidParameter(format!(
            "{}: expected a .ser file or a directory of frames",
            path.display()
        ))),
    }
}
