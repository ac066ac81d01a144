use std::cell::Cell;

use ndarray::Array2;
use umbra_core::detection::{
    CircleDetector, CircleOrigin, CirclePick, CircleTracker, DetectedCircle, TrackState,
};
use umbra_core::frame::CircleEstimate;

const DEFAULT: CircleEstimate = CircleEstimate::new(680, 630, 280);

/// Replays a fixed list of per-frame detections.
struct ScriptedDetector {
    script: Vec<Vec<DetectedCircle>>,
    calls: Cell<usize>,
}

impl ScriptedDetector {
    fn new(script: Vec<Vec<DetectedCircle>>) -> Self {
        Self {
            script,
            calls: Cell::new(0),
        }
    }
}

impl CircleDetector for ScriptedDetector {
    fn detect(&self, _gray: &Array2<f32>) -> Vec<DetectedCircle> {
        let i = self.calls.get();
        self.calls.set(i + 1);
        self.script.get(i).cloned().unwrap_or_default()
    }
}

fn found(x: f32, y: f32, radius: f32) -> Vec<DetectedCircle> {
    vec![DetectedCircle {
        x,
        y,
        radius,
        votes: 100,
    }]
}

fn run(script: Vec<Vec<DetectedCircle>>) -> Vec<(CircleEstimate, CircleOrigin)> {
    let frames = script.len();
    let mut tracker = CircleTracker::with_detector(ScriptedDetector::new(script), CirclePick::Last, DEFAULT);
    let gray = Array2::<f32>::zeros((8, 8));
    (0..frames)
        .map(|_| {
            let t = tracker.track(&gray);
            (t.estimate, t.origin)
        })
        .collect()
}

#[test]
fn test_miss_on_first_frame_uses_default() {
    let out = run(vec![vec![], found(100.0, 90.0, 40.0)]);
    assert_eq!(out[0], (DEFAULT, CircleOrigin::Default));
    assert_eq!(out[1], (CircleEstimate::new(100, 90, 40), CircleOrigin::Detected));
}

#[test]
fn test_miss_carries_previous_estimate_forward() {
    let out = run(vec![
        found(100.0, 90.0, 40.0),
        vec![],
        vec![],
        found(103.4, 91.6, 41.2),
        vec![],
    ]);
    let estimates: Vec<CircleEstimate> = out.iter().map(|(e, _)| *e).collect();
    for k in [1, 2, 4] {
        assert_eq!(estimates[k], estimates[k - 1], "frame {k}");
        assert_eq!(out[k].1, CircleOrigin::CarriedForward);
    }
    assert_eq!(estimates[3], CircleEstimate::new(103, 92, 41));
}

#[test]
fn test_default_persists_until_first_detection() {
    let out = run(vec![vec![], vec![], found(10.0, 10.0, 5.0), vec![]]);
    assert_eq!(out[0].0, DEFAULT);
    assert_eq!(out[1], (DEFAULT, CircleOrigin::Default));
    assert_eq!(out[3], (CircleEstimate::new(10, 10, 5), CircleOrigin::CarriedForward));
}

#[test]
fn test_radius_never_negative() {
    let out = run(vec![found(5.0, 5.0, -3.0), found(5.0, 5.0, 0.4)]);
    for (estimate, _) in out {
        assert_eq!(estimate.radius, 0);
    }
}

#[test]
fn test_stats_count_origins() {
    let mut tracker = CircleTracker::with_detector(
        ScriptedDetector::new(vec![vec![], found(1.0, 1.0, 1.0), vec![]]),
        CirclePick::Last,
        DEFAULT,
    );
    let gray = Array2::<f32>::zeros((8, 8));
    for _ in 0..3 {
        tracker.track(&gray);
    }
    let stats = tracker.stats();
    assert_eq!((stats.defaulted, stats.detected, stats.carried_forward), (1, 1, 1));
    assert_eq!(stats.frames(), 3);
    assert_eq!(tracker.state().last_accepted(), Some(CircleEstimate::new(1, 1, 1)));
}

#[test]
fn test_pick_policy_selects_among_detections() {
    let many = vec![
        DetectedCircle { x: 10.0, y: 10.0, radius: 30.0, votes: 200 },
        DetectedCircle { x: 50.0, y: 50.0, radius: 60.0, votes: 150 },
        DetectedCircle { x: 90.0, y: 90.0, radius: 20.0, votes: 80 },
    ];
    let state = TrackState::new();
    let (_, last) = state.advance(&many, CirclePick::Last, DEFAULT);
    let (_, strongest) = state.advance(&many, CirclePick::Strongest, DEFAULT);
    let (_, largest) = state.advance(&many, CirclePick::Largest, DEFAULT);
    assert_eq!(last.estimate, CircleEstimate::new(90, 90, 20));
    assert_eq!(strongest.estimate, CircleEstimate::new(10, 10, 30));
    assert_eq!(largest.estimate, CircleEstimate::new(50, 50, 60));
    assert_eq!(last.detections, 3);
}
