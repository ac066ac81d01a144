use std::ops::Range;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_POLAR_MARGIN, FULL_TURN_DEGREES, PARALLEL_SAMPLE_THRESHOLD};
use crate::error::{Result, UmbraError};
use crate::frame::{CircleEstimate, RgbFrame};

use super::sampling::{axis_groups, check_compression, group_positions, SamplingStrategy};

/// What to do with a sample coordinate that falls outside the frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryPolicy {
    /// Clamp both axes to the nearest edge pixel.
    #[default]
    Clamp,
    /// Report `SampleOutOfBounds`.
    Fail,
    /// Wrap both axes around the frame.
    Wrap,
}

impl std::fmt::Display for BoundaryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Clamp => write!(f, "Clamp"),
            Self::Fail => write!(f, "Fail"),
            Self::Wrap => write!(f, "Wrap"),
        }
    }
}

/// Angular/radial profile settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolarConfig {
    /// Sweep radius `R`: rays cover radii `1..R`. `None` takes the first
    /// sampled frame's radius plus a fixed margin and holds it for the run.
    pub max_radius: Option<u32>,
    /// Keep one angle per `angular_compress` degrees.
    pub angular_compress: usize,
    /// Keep one radius per `radial_compress` pixels.
    pub radial_compress: usize,
    pub strategy: SamplingStrategy,
    pub boundary: BoundaryPolicy,
}

impl Default for PolarConfig {
    fn default() -> Self {
        Self {
            max_radius: None,
            angular_compress: 1,
            radial_compress: 1,
            strategy: SamplingStrategy::Stride,
            boundary: BoundaryPolicy::Clamp,
        }
    }
}

impl PolarConfig {
    /// Sweep radius for a run whose first estimate is `circle`.
    pub fn sweep_radius(&self, circle: &CircleEstimate) -> u32 {
        self.max_radius
            .unwrap_or_else(|| circle.radius.saturating_add(DEFAULT_POLAR_MARGIN))
    }

    pub fn validate(&self) -> Result<()> {
        check_compression(self.angular_compress)?;
        check_compression(self.radial_compress)?;
        if let Some(r) = self.max_radius {
            check_sweep_radius(r as usize)?;
        }
        Ok(())
    }
}

fn check_sweep_radius(max_radius: usize) -> Result<()> {
    if max_radius < 2 {
        return Err(UmbraError::InvalidParameter(format!(
            "sweep radius must be at least 2, got {max_radius}"
        )));
    }
    Ok(())
}

/// Pixel offset of radius `r` along a direction, truncated toward zero.
#[inline]
pub fn polar_offset(r: usize, cos: f64, sin: f64) -> (i64, i64) {
    ((r as f64 * cos) as i64, (r as f64 * sin) as i64)
}

/// Samples mean-channel intensities on rays and rings around a fixed center.
pub struct PolarSampler<'a> {
    frame: &'a RgbFrame,
    cx: i64,
    cy: i64,
    max_radius: usize,
    boundary: BoundaryPolicy,
    /// `(cos, sin)` of every integer degree.
    directions: Vec<(f64, f64)>,
}

impl<'a> PolarSampler<'a> {
    pub fn new(
        frame: &'a RgbFrame,
        center: &CircleEstimate,
        max_radius: u32,
        boundary: BoundaryPolicy,
    ) -> Result<Self> {
        check_sweep_radius(max_radius as usize)?;
        let directions = (0..FULL_TURN_DEGREES)
            .map(|deg| {
                let theta = (deg as f64).to_radians();
                (theta.cos(), theta.sin())
            })
            .collect();
        Ok(Self {
            frame,
            cx: center.x as i64,
            cy: center.y as i64,
            max_radius: max_radius as usize,
            boundary,
            directions,
        })
    }

    /// Map a coordinate into the frame according to the boundary policy.
    pub fn resolve(&self, x: i64, y: i64) -> Result<(usize, usize)> {
        let w = self.frame.width() as i64;
        let h = self.frame.height() as i64;
        let inside = (0..w).contains(&x) && (0..h).contains(&y);
        if inside {
            return Ok((x as usize, y as usize));
        }
        match self.boundary {
            BoundaryPolicy::Clamp => Ok((x.clamp(0, w - 1) as usize, y.clamp(0, h - 1) as usize)),
            BoundaryPolicy::Wrap => Ok((x.rem_euclid(w) as usize, y.rem_euclid(h) as usize)),
            BoundaryPolicy::Fail => Err(UmbraError::SampleOutOfBounds {
                x,
                y,
                width: w as usize,
                height: h as usize,
            }),
        }
    }

    /// Intensity at radius `r` along integer angle `degree`.
    pub fn sample(&self, degree: usize, r: usize) -> Result<f64> {
        let (cos, sin) = self.directions[degree % FULL_TURN_DEGREES];
        let (dx, dy) = polar_offset(r, cos, sin);
        let (x, y) = self.resolve(self.cx + dx, self.cy + dy)?;
        Ok(self.frame.intensity(y, x))
    }

    /// Mean intensity along one ray over radii `1..R`.
    pub fn ray_mean(&self, degree: usize) -> Result<f64> {
        let mut sum = 0.0;
        for r in self.radii() {
            sum += self.sample(degree, r)?;
        }
        Ok(sum / (self.max_radius - 1) as f64)
    }

    /// Mean intensity over all 360 angles at radius `r`.
    pub fn ring_mean(&self, r: usize) -> Result<f64> {
        let mut sum = 0.0;
        for degree in 0..FULL_TURN_DEGREES {
            sum += self.sample(degree, r)?;
        }
        Ok(sum / FULL_TURN_DEGREES as f64)
    }

    /// Intensity vs. angle, averaged along each ray.
    pub fn angular_profile(&self, compress: usize, strategy: SamplingStrategy) -> Result<Vec<f64>> {
        let groups = axis_groups(0..FULL_TURN_DEGREES, compress, strategy)?;
        let work = groups.len() * compress.min(FULL_TURN_DEGREES) * self.max_radius;
        profile(groups, work, |deg| self.ray_mean(deg))
    }

    /// Intensity vs. radius, averaged around each ring.
    pub fn radial_profile(&self, compress: usize, strategy: SamplingStrategy) -> Result<Vec<f64>> {
        let groups = axis_groups(self.radii(), compress, strategy)?;
        let work = self.max_radius * FULL_TURN_DEGREES;
        profile(groups, work, |r| self.ring_mean(r))
    }

    fn radii(&self) -> Range<usize> {
        1..self.max_radius
    }
}

/// Evaluate one mean per group, in parallel when there is enough work.
fn profile<F>(groups: Vec<Range<usize>>, work: usize, value: F) -> Result<Vec<f64>>
where
    F: Fn(usize) -> Result<f64> + Sync,
{
    let group_value = |g: Range<usize>| -> Result<f64> {
        let n = g.len() as f64;
        let mut sum = 0.0;
        for v in g {
            sum += value(v)?;
        }
        Ok(sum / n)
    };

    if work >= PARALLEL_SAMPLE_THRESHOLD {
        groups.into_par_iter().map(group_value).collect()
    } else {
        groups.into_iter().map(group_value).collect()
    }
}

/// Angles (degrees) labelling each value of an angular profile.
pub fn angular_positions(compress: usize, strategy: SamplingStrategy) -> Result<Vec<usize>> {
    Ok(group_positions(&axis_groups(0..FULL_TURN_DEGREES, compress, strategy)?))
}

/// Radii (pixels) labelling each value of a radial profile.
pub fn radial_positions(max_radius: u32, compress: usize, strategy: SamplingStrategy) -> Result<Vec<usize>> {
    check_sweep_radius(max_radius as usize)?;
    Ok(group_positions(&axis_groups(1..max_radius as usize, compress, strategy)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_truncate_toward_zero() {
        let theta = 135f64.to_radians();
        assert_eq!(polar_offset(3, theta.cos(), theta.sin()), (-2, 2));
        let theta = 90f64.to_radians();
        assert_eq!(polar_offset(10, theta.cos(), theta.sin()), (0, 10));
    }

    #[test]
    fn sweep_radius_follows_circle_when_unset() {
        let config = PolarConfig::default();
        let circle = CircleEstimate::new(0, 0, 50);
        assert_eq!(config.sweep_radius(&circle), 50 + DEFAULT_POLAR_MARGIN);
        let fixed = PolarConfig {
            max_radius: Some(30),
            ..Default::default()
        };
        assert_eq!(fixed.sweep_radius(&circle), 30);
    }
}
