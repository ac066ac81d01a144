use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::detection::{CircleDetector, CircleTracker, TrackedCircle, TrackingStats};
use crate::error::Result;
use crate::frame::{CircleEstimate, RgbFrame};
use crate::io::{open_source, FrameSource, SampledFrames};
use crate::profile::{ChannelProfiles, PolarSampler};
use crate::series::{FrameRecord, SeriesStore};

use super::config::AnalysisConfig;
use super::types::{AnalysisStage, NoOpReporter, ProgressReporter};

/// Result of one analysis run.
#[derive(Debug)]
pub struct AnalysisOutput {
    pub series: SeriesStore,
    /// One entry per sampled frame, in order.
    pub tracks: Vec<TrackedCircle>,
    pub stats: TrackingStats,
    /// Files written by `run_analysis`; empty for in-memory runs.
    pub written: Vec<PathBuf>,
}

/// Open the configured input, analyze it and save every series.
pub fn run_analysis(config: &AnalysisConfig) -> Result<AnalysisOutput> {
    run_analysis_reported(config, Arc::new(NoOpReporter))
}

/// Like `run_analysis`, with progress reporting.
pub fn run_analysis_reported(
    config: &AnalysisConfig,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<AnalysisOutput> {
    config.validate()?;

    reporter.begin_stage(AnalysisStage::Opening, None);
    let source = open_source(&config.input, config.source_frame_rate)?;
    reporter.finish_stage();

    let mut output = analyze_source(source.as_ref(), config, reporter.as_ref())?;

    reporter.begin_stage(AnalysisStage::Writing, None);
    output.written = output
        .series
        .save(&config.output_dir, &config.output_stem())?;
    reporter.finish_stage();

    Ok(output)
}

/// Analyze a frame source with the Hough tracker described by `config`.
pub fn analyze_source<S: FrameSource + ?Sized>(
    source: &S,
    config: &AnalysisConfig,
    reporter: &dyn ProgressReporter,
) -> Result<AnalysisOutput> {
    let mut tracker = CircleTracker::from_config(&config.tracking);
    analyze_with_tracker(source, config, &mut tracker, reporter)
}

/// Analyze a frame source with a caller-supplied tracker.
///
/// Frames are visited strictly in sampling order; each frame's circle
/// estimate depends on every earlier frame.
pub fn analyze_with_tracker<S, D>(
    source: &S,
    config: &AnalysisConfig,
    tracker: &mut CircleTracker<D>,
    reporter: &dyn ProgressReporter,
) -> Result<AnalysisOutput>
where
    S: FrameSource + ?Sized,
    D: CircleDetector,
{
    let frames = SampledFrames::new(source, config.sample_fps)?;
    let total = frames.total();
    let src = source.info();
    info!(
        source = %src.filename.display(),
        total_frames = src.total_frames,
        frame_rate = src.frame_rate,
        sample_fps = config.sample_fps,
        samples = total,
        "Analyzing clip"
    );

    reporter.begin_stage(AnalysisStage::Analyzing, Some(total));
    let mut series = SeriesStore::new();
    let mut tracks = Vec::with_capacity(total);

    // Held for the whole run so every radial row has the same length.
    let mut sweep_radius = config.polar.max_radius;

    for (done, frame) in frames.enumerate() {
        let frame = frame?;
        let tracked = tracker.track_frame(&frame);
        let radius = *sweep_radius.get_or_insert_with(|| {
            let r = config.polar.sweep_radius(&tracked.estimate);
            debug!(sweep_radius = r, "Polar sweep radius fixed for run");
            r
        });
        series.push(analyze_frame(&frame, tracked.estimate, radius, config)?)?;
        tracks.push(tracked);
        reporter.advance(done + 1);
    }
    reporter.finish_stage();

    let stats = tracker.stats();
    if stats.detected == 0 {
        warn!(
            frames = stats.frames(),
            "No circle detected in any sampled frame; profiles use the default circle"
        );
    }
    info!(
        detected = stats.detected,
        carried_forward = stats.carried_forward,
        defaulted = stats.defaulted,
        "Analysis complete"
    );

    Ok(AnalysisOutput {
        series,
        tracks,
        stats,
        written: Vec::new(),
    })
}

/// Compute the selected series of one frame around `circle`, sweeping polar
/// rays out to `sweep_radius`.
pub fn analyze_frame(
    frame: &RgbFrame,
    circle: CircleEstimate,
    sweep_radius: u32,
    config: &AnalysisConfig,
) -> Result<FrameRecord> {
    let selection = &config.series;
    let mut record = FrameRecord {
        circle: Some(circle),
        ..Default::default()
    };

    if selection.needs_channels() {
        let profiles = ChannelProfiles::compute(frame, &config.channels)?;
        record.rgb = selection.rgb.then_some(profiles.mean_rgb);
        record.rows = selection.rows.then_some(profiles.rows);
        record.cols = selection.cols.then_some(profiles.cols);
    }

    if selection.needs_polar() {
        let polar = &config.polar;
        let sampler = PolarSampler::new(frame, &circle, sweep_radius, polar.boundary)?;
        if selection.angular {
            record.angular = Some(sampler.angular_profile(polar.angular_compress, polar.strategy)?);
        }
        if selection.radial {
            record.radial = Some(sampler.radial_profile(polar.radial_compress, polar.strategy)?);
        }
    }

    Ok(record)
}
