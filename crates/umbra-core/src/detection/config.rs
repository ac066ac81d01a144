use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_ACCUMULATOR_THRESHOLD, DEFAULT_CANNY_THRESHOLD, DEFAULT_CIRCLE_RADIUS,
    DEFAULT_CIRCLE_X, DEFAULT_CIRCLE_Y, DEFAULT_HOUGH_BLUR_SIGMA, DEFAULT_HOUGH_DP,
    DEFAULT_HOUGH_MIN_DIST,
};
use crate::error::{Result, UmbraError};
use crate::frame::CircleEstimate;

/// Parameters of the Hough-gradient circle detector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughParams {
    /// Inverse accumulator resolution: 1.0 = one cell per pixel, 2.0 = half size.
    pub dp: f32,
    /// Minimum distance between two accepted circle centers.
    pub min_dist: f32,
    /// Upper Canny threshold; the lower one is half of it.
    pub canny_threshold: f32,
    /// Minimum center votes, and minimum edge support of the chosen radius.
    pub accumulator_threshold: u32,
    /// Smallest radius searched. 0 = no lower bound.
    pub min_radius: u32,
    /// Largest radius searched. 0 = up to the larger frame dimension.
    pub max_radius: u32,
    /// Gaussian pre-smoothing before edge detection. 0 disables it.
    pub blur_sigma: f32,
}

impl Default for HoughParams {
    fn default() -> Self {
        Self {
            dp: DEFAULT_HOUGH_DP,
            min_dist: DEFAULT_HOUGH_MIN_DIST,
            canny_threshold: DEFAULT_CANNY_THRESHOLD,
            accumulator_threshold: DEFAULT_ACCUMULATOR_THRESHOLD,
            min_radius: 0,
            max_radius: 0,
            blur_sigma: DEFAULT_HOUGH_BLUR_SIGMA,
        }
    }
}

impl HoughParams {
    pub fn validate(&self) -> Result<()> {
        if self.dp.is_nan() || self.dp < 1.0 {
            return Err(UmbraError::InvalidParameter(format!(
                "dp must be >= 1.0, got {}",
                self.dp
            )));
        }
        if self.canny_threshold.is_nan() || self.canny_threshold <= 0.0 {
            return Err(UmbraError::InvalidParameter(format!(
                "canny_threshold must be positive, got {}",
                self.canny_threshold
            )));
        }
        if self.min_dist < 0.0 || !self.min_dist.is_finite() {
            return Err(UmbraError::InvalidParameter(format!(
                "min_dist must be a non-negative number, got {}",
                self.min_dist
            )));
        }
        if !self.blur_sigma.is_finite() || self.blur_sigma < 0.0 {
            return Err(UmbraError::InvalidParameter(format!(
                "blur_sigma must be a non-negative number, got {}",
                self.blur_sigma
            )));
        }
        if self.max_radius != 0 && self.max_radius < self.min_radius {
            return Err(UmbraError::InvalidParameter(format!(
                "max_radius {} is below min_radius {}",
                self.max_radius, self.min_radius
            )));
        }
        Ok(())
    }
}

/// Which detection to keep when the detector reports several circles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CirclePick {
    /// Last circle in detector order (the weakest).
    #[default]
    Last,
    /// First circle in detector order (the most votes).
    Strongest,
    /// Circle with the largest radius.
    Largest,
}

impl std::fmt::Display for CirclePick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Last => write!(f, "Last"),
            Self::Strongest => write!(f, "Strongest"),
            Self::Largest => write!(f, "Largest"),
        }
    }
}

/// Circle tracking configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub hough: HoughParams,
    pub pick: CirclePick,
    /// Estimate reported until the first successful detection.
    pub default_circle: CircleEstimate,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            hough: HoughParams::default(),
            pick: CirclePick::default(),
            default_circle: CircleEstimate::new(
                DEFAULT_CIRCLE_X,
                DEFAULT_CIRCLE_Y,
                DEFAULT_CIRCLE_RADIUS,
            ),
        }
    }
}
