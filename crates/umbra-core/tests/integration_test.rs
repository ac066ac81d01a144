mod common;

use std::io::Write;
use std::sync::{Arc, Mutex};

use approx::assert_abs_diff_eq;
use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;
use umbra_core::detection::CircleOrigin;
use umbra_core::io::memory::FrameBuffer;
use umbra_core::io::table::read_table;
use umbra_core::pipeline::config::AnalysisConfig;
use umbra_core::pipeline::{analyze_source, run_analysis, AnalysisStage, NoOpReporter, ProgressReporter};
use umbra_core::series::SeriesSelection;

use common::{build_ser_with_frames, disk_bytes, disk_frame, write_test_ser};

fn disk_clip(frames: usize) -> FrameBuffer {
    let frames = (0..frames)
        .map(|_| disk_frame(200, 200, 100.0, 100.0, 50.0, [255, 255, 255]))
        .collect();
    FrameBuffer::new(frames, 1.0).unwrap()
}

fn disk_config() -> AnalysisConfig {
    let mut config = AnalysisConfig::new("disk".into());
    config.polar.max_radius = Some(100);
    config
}

#[test]
fn test_synthetic_disk_clip() {
    let clip = disk_clip(10);
    let output = analyze_source(&clip, &disk_config(), &NoOpReporter).unwrap();

    assert_eq!(output.series.frame_count(), 10);
    assert_eq!(output.stats.detected, 10);
    for c in output.series.circles() {
        assert!((c.x - 100).abs() <= 2, "x={}", c.x);
        assert!((c.y - 100).abs() <= 2, "y={}", c.y);
        assert!((c.radius as i32 - 50).abs() <= 2, "r={}", c.radius);
    }

    for radial in output.series.radial() {
        assert_eq!(radial.len(), 99);
        // Index i holds radius i + 1.
        assert_abs_diff_eq!(radial[9], 255.0, epsilon = 1e-9);
        assert_abs_diff_eq!(radial[59], 0.0, epsilon = 1e-9);
    }
    for angular in output.series.angular() {
        assert_eq!(angular.len(), 360);
    }

    let area = std::f64::consts::PI * 50.0 * 50.0 / (200.0 * 200.0);
    for rgb in output.series.rgb() {
        assert_abs_diff_eq!(rgb[0], 255.0 * area, epsilon = 1.0);
    }
}

#[test]
fn test_blank_clip_falls_back_to_default_circle() {
    let frames = (0..3)
        .map(|_| umbra_core::frame::RgbFrame::solid(64, 64, [0, 0, 0]).unwrap())
        .collect();
    let clip = FrameBuffer::new(frames, 1.0).unwrap();
    let mut config = disk_config();
    config.polar.max_radius = Some(10);

    let output = analyze_source(&clip, &config, &NoOpReporter).unwrap();
    assert_eq!(output.stats.defaulted, 3);
    assert!(output.tracks.iter().all(|t| t.origin == CircleOrigin::Default));
    assert!(output.series.circles().iter().all(|c| *c == config.tracking.default_circle));
    // Default center lies outside the frame; clamped samples are still black.
    assert!(output.series.radial()[0].iter().all(|&v| v == 0.0));
}

#[test]
fn test_selection_limits_series() {
    let clip = disk_clip(2);
    let mut config = disk_config();
    config.series = SeriesSelection {
        radial: false,
        angular: false,
        rows: false,
        ..SeriesSelection::default()
    };

    let output = analyze_source(&clip, &config, &NoOpReporter).unwrap();
    assert_eq!(output.series.rgb().len(), 2);
    assert_eq!(output.series.cols().len(), 2);
    assert!(output.series.rows().is_empty());
    assert!(output.series.radial().is_empty());
    assert!(output.series.angular().is_empty());
}

#[derive(Default)]
struct RecordingReporter {
    events: Mutex<Vec<String>>,
}

impl ProgressReporter for RecordingReporter {
    fn begin_stage(&self, stage: AnalysisStage, total_items: Option<usize>) {
        self.events.lock().unwrap().push(format!("{stage}:{total_items:?}"));
    }

    fn advance(&self, items_done: usize) {
        self.events.lock().unwrap().push(format!("+{items_done}"));
    }
}

#[test]
fn test_progress_events() {
    let clip = disk_clip(3);
    let mut config = disk_config();
    config.series = SeriesSelection::none();
    let reporter = RecordingReporter::default();
    analyze_source(&clip, &config, &reporter).unwrap();

    let events = reporter.events.into_inner().unwrap();
    assert_eq!(events, vec!["Analyzing frames:Some(3)", "+1", "+2", "+3"]);
}

#[test]
fn test_run_analysis_from_ser_writes_tables() {
    let frames: Vec<Vec<u8>> = (0..4).map(|_| disk_bytes(160, 140, 80.0, 70.0, 40.0, 230)).collect();
    let file = write_test_ser(&build_ser_with_frames(160, 140, 0, &frames));
    let out = TempDir::new().unwrap();

    let mut config = AnalysisConfig::new(file.path().to_path_buf());
    config.output_dir = out.path().join("series");
    config.source_frame_rate = Some(2.0);
    config.polar.max_radius = Some(60);
    config.polar.angular_compress = 10;

    let output = run_analysis(&config).unwrap();
    // 4 frames at 2 fps, sampled at 1 fps.
    assert_eq!(output.series.frame_count(), 2);
    assert_eq!(output.written.len(), 9);

    let coords = read_table(&out.path().join("series").join("circle_coords.txt")).unwrap();
    assert_eq!(coords.len(), 2);
    for row in &coords {
        assert!((row[0] - 80.0).abs() <= 2.0);
        assert!((row[1] - 70.0).abs() <= 2.0);
        assert!((row[2] - 40.0).abs() <= 2.0);
    }

    let stem = config.output_stem();
    let angular = read_table(&out.path().join("series").join(format!("angular_{stem}.txt"))).unwrap();
    assert_eq!(angular[0].len(), 36);
}

#[test]
fn test_default_sweep_radius_is_held_across_frames() {
    let frames = [50.0, 53.0, 47.0]
        .iter()
        .map(|&r| disk_frame(200, 200, 100.0, 100.0, r, [255, 255, 255]))
        .collect();
    let clip = FrameBuffer::new(frames, 1.0).unwrap();
    let config = AnalysisConfig::new("growing".into());
    assert_eq!(config.polar.max_radius, None);

    let output = analyze_source(&clip, &config, &NoOpReporter).unwrap();
    let circles = output.series.circles();
    assert_eq!(circles.len(), 3);
    assert!(circles[1].radius > circles[0].radius);

    // Rays run over 1..R with R = first radius + 100.
    let expected = circles[0].radius as usize + 99;
    let radial = output.series.radial_array().unwrap();
    assert_eq!(radial.dim(), (3, expected));
    assert!(output.series.angular_array().is_ok());
}

/// Collects formatted log output for assertions.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn analyze_with_logs(clip: &FrameBuffer, config: &AnalysisConfig) -> String {
    let logs = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, || {
        analyze_source(clip, config, &NoOpReporter).unwrap();
    });
    logs.contents()
}

#[test]
fn test_all_miss_run_warns() {
    let frames = (0..2)
        .map(|_| umbra_core::frame::RgbFrame::solid(32, 32, [0, 0, 0]).unwrap())
        .collect();
    let clip = FrameBuffer::new(frames, 1.0).unwrap();
    let mut config = disk_config();
    config.series = SeriesSelection::none();

    let logs = analyze_with_logs(&clip, &config);
    assert!(logs.contains("No circle detected in any sampled frame"), "{logs}");
    assert_eq!(logs.matches("using default estimate").count(), 2, "{logs}");
}

#[test]
fn test_detected_run_does_not_warn() {
    let clip = disk_clip(2);
    let mut config = disk_config();
    config.series = SeriesSelection::none();

    let logs = analyze_with_logs(&clip, &config);
    assert!(!logs.contains("WARN"), "{logs}");
}
