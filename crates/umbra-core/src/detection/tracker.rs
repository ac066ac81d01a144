use ndarray::Array2;
use tracing::{debug, warn};

use crate::frame::{CircleEstimate, RgbFrame};

use super::config::{CirclePick, TrackingConfig};
use super::hough::{CircleDetector, DetectedCircle, HoughCircleDetector};

/// How a frame's circle estimate was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CircleOrigin {
    /// The detector found the circle in this frame.
    Detected,
    /// Detection missed; the last accepted estimate was reused.
    CarriedForward,
    /// Detection missed and nothing had been accepted yet.
    Default,
}

/// Circle estimate of one frame plus where it came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackedCircle {
    pub estimate: CircleEstimate,
    pub origin: CircleOrigin,
    /// Number of circles the detector reported for the frame.
    pub detections: usize,
}

/// Last accepted circle of a clip.
///
/// Only a successful detection changes it; misses and the default estimate
/// leave it untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrackState {
    last: Option<CircleEstimate>,
}

impl TrackState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_accepted(&self) -> Option<CircleEstimate> {
        self.last
    }

    /// Fold one frame's detections into the state.
    pub fn advance(
        self,
        detections: &[DetectedCircle],
        pick: CirclePick,
        default: CircleEstimate,
    ) -> (TrackState, TrackedCircle) {
        let count = detections.len();
        if let Some(chosen) = pick_circle(detections, pick) {
            let estimate = chosen.to_estimate();
            let tracked = TrackedCircle {
                estimate,
                origin: CircleOrigin::Detected,
                detections: count,
            };
            return (
                TrackState {
                    last: Some(estimate),
                },
                tracked,
            );
        }

        let tracked = match self.last {
            Some(estimate) => TrackedCircle {
                estimate,
                origin: CircleOrigin::CarriedForward,
                detections: 0,
            },
            None => TrackedCircle {
                estimate: default,
                origin: CircleOrigin::Default,
                detections: 0,
            },
        };
        (self, tracked)
    }
}

fn pick_circle(detections: &[DetectedCircle], pick: CirclePick) -> Option<DetectedCircle> {
    match pick {
        CirclePick::Last => detections.last().copied(),
        CirclePick::Strongest => detections.first().copied(),
        CirclePick::Largest => detections
            .iter()
            .copied()
            .reduce(|best, c| if c.radius > best.radius { c } else { best }),
    }
}

/// Per-run counts of how estimates were obtained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrackingStats {
    pub detected: usize,
    pub carried_forward: usize,
    pub defaulted: usize,
}

impl TrackingStats {
    pub fn frames(&self) -> usize {
        self.detected + self.carried_forward + self.defaulted
    }
}

/// Sequential circle tracker: runs the detector on each frame and threads a
/// `TrackState` from one frame to the next.
pub struct CircleTracker<D = HoughCircleDetector> {
    detector: D,
    pick: CirclePick,
    default_circle: CircleEstimate,
    state: TrackState,
    stats: TrackingStats,
}

impl CircleTracker<HoughCircleDetector> {
    pub fn from_config(config: &TrackingConfig) -> Self {
        Self::with_detector(
            HoughCircleDetector::new(config.hough.clone()),
            config.pick,
            config.default_circle,
        )
    }
}

impl<D: CircleDetector> CircleTracker<D> {
    pub fn with_detector(detector: D, pick: CirclePick, default_circle: CircleEstimate) -> Self {
        Self {
            detector,
            pick,
            default_circle,
            state: TrackState::new(),
            stats: TrackingStats::default(),
        }
    }

    /// Track the circle in a grayscale frame.
    pub fn track(&mut self, gray: &Array2<f32>) -> TrackedCircle {
        let detections = self.detector.detect(gray);
        let frame = self.stats.frames();
        let (state, tracked) = self.state.advance(&detections, self.pick, self.default_circle);
        self.state = state;

        let e = tracked.estimate;
        match tracked.origin {
            CircleOrigin::Detected => {
                self.stats.detected += 1;
                debug!(
                    frame,
                    x = e.x,
                    y = e.y,
                    radius = e.radius,
                    found = tracked.detections,
                    "Circle detected"
                );
            }
            CircleOrigin::CarriedForward => {
                self.stats.carried_forward += 1;
                debug!(
                    frame,
                    x = e.x,
                    y = e.y,
                    radius = e.radius,
                    "No circle; carrying last estimate forward"
                );
            }
            CircleOrigin::Default => {
                self.stats.defaulted += 1;
                warn!(
                    frame,
                    x = e.x,
                    y = e.y,
                    radius = e.radius,
                    "No circle detected yet; using default estimate"
                );
            }
        }
        tracked
    }

    /// Track the circle in an RGB frame (converted to luminance first).
    pub fn track_frame(&mut self, frame: &RgbFrame) -> TrackedCircle {
        self.track(&frame.to_gray())
    }

    pub fn state(&self) -> TrackState {
        self.state
    }

    pub fn stats(&self) -> TrackingStats {
        self.stats
    }
}
