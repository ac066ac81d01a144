pub mod config;
pub mod edges;
pub mod hough;
pub mod tracker;

pub use config::{CirclePick, HoughParams, TrackingConfig};
pub use hough::{CircleDetector, DetectedCircle, HoughCircleDetector};
pub use tracker::{CircleOrigin, CircleTracker, TrackState, TrackedCircle, TrackingStats};
