use crate::error::{Result, UmbraError};
use crate::frame::{RgbFrame, SourceInfo};

/// A random-access stream of decoded frames.
///
/// Implementors decode on demand; `frame_at` must be cheap enough to be called
/// once per sampled frame.
pub trait FrameSource {
    fn info(&self) -> &SourceInfo;

    fn frame_at(&self, index: usize) -> Result<RgbFrame>;

    fn frame_count(&self) -> usize {
        self.info().total_frames
    }
}

impl<S: FrameSource + ?Sized> FrameSource for &S {
    fn info(&self) -> &SourceInfo {
        (**self).info()
    }

    fn frame_at(&self, index: usize) -> Result<RgbFrame> {
        (**self).frame_at(index)
    }
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn info(&self) -> &SourceInfo {
        (**self).info()
    }

    fn frame_at(&self, index: usize) -> Result<RgbFrame> {
        (**self).frame_at(index)
    }
}

/// Slack for floating-point error when converting times to frame indices.
const TIME_EPSILON: f64 = 1e-6;

/// Source frame indices visited when sampling `info` at `fps` frames per second.
///
/// Sample `k` is taken at `t = k / fps` for every `t` strictly inside the clip
/// duration; it maps to frame `floor(t * frame_rate)`, clamped to the last frame.
pub fn sample_indices(info: &SourceInfo, fps: f64) -> Result<Vec<usize>> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(UmbraError::InvalidParameter(format!(
            "sample rate must be positive, got {fps}"
        )));
    }
    if info.total_frames == 0 {
        return Err(UmbraError::EmptySequence);
    }
    if !info.frame_rate.is_finite() || info.frame_rate <= 0.0 {
        return Err(UmbraError::InvalidParameter(format!(
            "source frame rate must be positive, got {}",
            info.frame_rate
        )));
    }

    let samples = (info.duration() * fps - TIME_EPSILON).ceil().max(1.0) as usize;
    let last = info.total_frames - 1;
    Ok((0..samples)
        .map(|k| {
            let t = k as f64 / fps;
            ((t * info.frame_rate + TIME_EPSILON).floor() as usize).min(last)
        })
        .collect())
}

/// Iterator over the frames of a source at a fixed sampling rate.
pub struct SampledFrames<'a, S: FrameSource + ?Sized> {
    source: &'a S,
    indices: Vec<usize>,
    pos: usize,
}

impl<'a, S: FrameSource + ?Sized> SampledFrames<'a, S> {
    pub fn new(source: &'a S, fps: f64) -> Result<Self> {
        let indices = sample_indices(source.info(), fps)?;
        Ok(Self {
            source,
            indices,
            pos: 0,
        })
    }

    /// Number of frames this iterator yields in total.
    pub fn total(&self) -> usize {
        self.indices.len()
    }
}

impl<S: FrameSource + ?Sized> Iterator for SampledFrames<'_, S> {
    type Item = Result<RgbFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = *self.indices.get(self.pos)?;
        self.pos += 1;
        Some(self.source.frame_at(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.indices.len() - self.pos;
        (remaining, Some(remaining))
    }
}

impl<S: FrameSource + ?Sized> ExactSizeIterator for SampledFrames<'_, S> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::ColorMode;
    use std::path::PathBuf;

    fn info(total_frames: usize, frame_rate: f64) -> SourceInfo {
        SourceInfo {
            filename: PathBuf::from("clip"),
            total_frames,
            width: 4,
            height: 4,
            bit_depth: 8,
            color_mode: ColorMode::RGB,
            frame_rate,
            observer: None,
            telescope: None,
            instrument: None,
        }
    }

    #[test]
    fn one_fps_on_thirty_fps_clip_takes_every_thirtieth_frame() {
        let idx = sample_indices(&info(90, 30.0), 1.0).unwrap();
        assert_eq!(idx, vec![0, 30, 60]);
    }

    #[test]
    fn partial_second_still_yields_a_sample() {
        let idx = sample_indices(&info(45, 30.0), 1.0).unwrap();
        assert_eq!(idx, vec![0, 30]);
    }

    #[test]
    fn oversampling_clamps_to_last_frame() {
        let idx = sample_indices(&info(2, 1.0), 2.0).unwrap();
        assert_eq!(idx, vec![0, 0, 1, 1]);
    }

    #[test]
    fn rejects_zero_fps_and_empty_sources() {
        assert!(matches!(
            sample_indices(&info(10, 30.0), 0.0),
            Err(UmbraError::InvalidParameter(_))
        ));
        assert!(matches!(
            sample_indices(&info(0, 30.0), 1.0),
            Err(UmbraError::EmptySequence)
        ));
    }
}
