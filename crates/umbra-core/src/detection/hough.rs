use ndarray::Array2;
use tracing::debug;

use crate::consts::HOUGH_RADIUS_WINDOW;
use crate::filters::gaussian_blur::gaussian_blur;
use crate::frame::CircleEstimate;

use super::config::HoughParams;
use super::edges::{canny, EdgeMap};

/// A circle reported by a detector, in sub-pixel image coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectedCircle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Accumulator support of the center.
    pub votes: u32,
}

impl DetectedCircle {
    /// Round to whole pixels.
    pub fn to_estimate(&self) -> CircleEstimate {
        CircleEstimate {
            x: self.x.round() as i32,
            y: self.y.round() as i32,
            radius: self.radius.round().max(0.0) as u32,
        }
    }
}

/// Anything that finds circles in a grayscale (0..=255) image.
///
/// Implementations return circles ordered by decreasing confidence.
pub trait CircleDetector {
    fn detect(&self, gray: &Array2<f32>) -> Vec<DetectedCircle>;
}

/// Hough-gradient circle detector.
///
/// Edge pixels vote along their gradient line for every candidate radius;
/// accumulator peaks become centers, and each center gets the radius with the
/// densest ring of edge pixels around it.
#[derive(Clone, Debug, Default)]
pub struct HoughCircleDetector {
    pub params: HoughParams,
}

impl HoughCircleDetector {
    pub fn new(params: HoughParams) -> Self {
        Self { params }
    }

    /// Searched radii, never beyond the larger frame dimension.
    fn radius_range(&self, h: usize, w: usize) -> (usize, usize) {
        let limit = h.max(w);
        let min_r = (self.params.min_radius as usize).max(1);
        let max_r = match self.params.max_radius as usize {
            0 => limit,
            r => r.min(limit),
        };
        (min_r, max_r)
    }
}

impl CircleDetector for HoughCircleDetector {
    fn detect(&self, gray: &Array2<f32>) -> Vec<DetectedCircle> {
        let (h, w) = gray.dim();
        if h < 3 || w < 3 {
            return Vec::new();
        }

        let smoothed = gaussian_blur(gray, self.params.blur_sigma);
        let edges = canny(&smoothed, self.params.canny_threshold);
        if edges.points.is_empty() {
            return Vec::new();
        }

        let (min_r, max_r) = self.radius_range(h, w);
        if min_r > max_r {
            return Vec::new();
        }
        let dp = self.params.dp;
        let raw = vote(&edges, h, w, dp, min_r, max_r);
        let acc = box_sum_3x3(&raw);
        let threshold = self.params.accumulator_threshold;

        let mut peaks = local_maxima(&acc, threshold);
        peaks.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        debug!(
            edges = edges.points.len(),
            candidates = peaks.len(),
            "Hough accumulator"
        );

        let min_dist_sq = self.params.min_dist * self.params.min_dist;
        let mut circles: Vec<DetectedCircle> = Vec::new();

        for (votes, cell) in peaks {
            let (cy, cx) = refine_center(&raw, cell, dp);
            let too_close = circles.iter().any(|c| {
                let (dx, dy) = (c.x - cx, c.y - cy);
                dx * dx + dy * dy < min_dist_sq
            });
            if too_close {
                continue;
            }
            if let Some(radius) = best_radius(&edges.points, cx, cy, min_r, max_r, threshold) {
                circles.push(DetectedCircle {
                    x: cx,
                    y: cy,
                    radius,
                    votes,
                });
            }
        }

        circles
    }
}

/// Cast gradient-direction votes from every edge pixel, both ways.
fn vote(edges: &EdgeMap, h: usize, w: usize, dp: f32, min_r: usize, max_r: usize) -> Array2<u32> {
    let acc_h = (h as f32 / dp).ceil() as usize + 1;
    let acc_w = (w as f32 / dp).ceil() as usize + 1;
    let mut acc = Array2::<u32>::zeros((acc_h, acc_w));

    for &(row, col) in &edges.points {
        let gx = edges.gradients.gx[[row, col]];
        let gy = edges.gradients.gy[[row, col]];
        let norm = (gx * gx + gy * gy).sqrt();
        if norm == 0.0 {
            continue;
        }
        let (ux, uy) = (gx / norm, gy / norm);

        for sign in [1.0f32, -1.0] {
            let mut last = None;
            let mut r = min_r as f32;
            while r <= max_r as f32 {
                let px = (col as f32 + sign * r * ux) / dp;
                let py = (row as f32 + sign * r * uy) / dp;
                let (ax, ay) = (px.round(), py.round());
                if ax < 0.0 || ay < 0.0 || ax >= acc_w as f32 || ay >= acc_h as f32 {
                    break;
                }
                let cell = (ay as usize, ax as usize);
                if last != Some(cell) {
                    acc[cell] += 1;
                    last = Some(cell);
                }
                r += dp;
            }
        }
    }

    acc
}

/// Sum over each 3x3 neighbourhood, so votes scattered by gradient noise
/// still form one peak.
fn box_sum_3x3(acc: &Array2<u32>) -> Array2<u32> {
    let (h, w) = acc.dim();
    Array2::from_shape_fn((h, w), |(row, col)| {
        let mut sum = 0;
        for r in row.saturating_sub(1)..=(row + 1).min(h - 1) {
            for c in col.saturating_sub(1)..=(col + 1).min(w - 1) {
                sum += acc[[r, c]];
            }
        }
        sum
    })
}

/// Cells above `threshold` that dominate their 8 neighbours. Ties go to the
/// cell that comes first in raster order.
fn local_maxima(acc: &Array2<u32>, threshold: u32) -> Vec<(u32, (usize, usize))> {
    let (h, w) = acc.dim();
    let mut peaks = Vec::new();

    for ((row, col), &v) in acc.indexed_iter() {
        if v <= threshold {
            continue;
        }
        let mut is_peak = true;
        'scan: for r in row.saturating_sub(1)..=(row + 1).min(h - 1) {
            for c in col.saturating_sub(1)..=(col + 1).min(w - 1) {
                if (r, c) == (row, col) {
                    continue;
                }
                let n = acc[[r, c]];
                let earlier = (r, c) < (row, col);
                if n > v || (earlier && n == v) {
                    is_peak = false;
                    break 'scan;
                }
            }
        }
        if is_peak {
            peaks.push((v, (row, col)));
        }
    }

    peaks
}

/// Vote-weighted centroid of the raw accumulator around a peak, in pixels.
/// Returns `(y, x)`.
fn refine_center(raw: &Array2<u32>, (row, col): (usize, usize), dp: f32) -> (f32, f32) {
    let (h, w) = raw.dim();
    let (mut sy, mut sx, mut sw) = (0.0f64, 0.0f64, 0.0f64);
    for r in row.saturating_sub(1)..=(row + 1).min(h - 1) {
        for c in col.saturating_sub(1)..=(col + 1).min(w - 1) {
            let v = raw[[r, c]] as f64;
            sy += r as f64 * v;
            sx += c as f64 * v;
            sw += v;
        }
    }
    if sw == 0.0 {
        return (row as f32 * dp, col as f32 * dp);
    }
    ((sy / sw) as f32 * dp, (sx / sw) as f32 * dp)
}

/// Radius with the most edge support per unit circumference around `(cx, cy)`.
///
/// Distances are binned to whole pixels and scored over a small window of
/// bins. `None` if no radius reaches `min_support` edge pixels.
fn best_radius(
    points: &[(usize, usize)],
    cx: f32,
    cy: f32,
    min_r: usize,
    max_r: usize,
    min_support: u32,
) -> Option<f32> {
    let mut hist = vec![0u32; max_r + 2];
    for &(row, col) in points {
        let dx = col as f32 - cx;
        let dy = row as f32 - cy;
        let d = (dx * dx + dy * dy).sqrt();
        let bin = d.round() as usize;
        if bin >= min_r && bin <= max_r {
            hist[bin] += 1;
        }
    }

    let window = HOUGH_RADIUS_WINDOW;
    let mut best: Option<(f32, usize, u32)> = None;
    for r in min_r..=max_r {
        let lo = r.saturating_sub(window).max(min_r);
        let hi = (r + window).min(max_r);
        let support: u32 = hist[lo..=hi].iter().sum();
        if support < min_support.max(1) {
            continue;
        }
        let score = support as f32 / r as f32;
        if best.map_or(true, |(s, _, _)| score > s) {
            best = Some((score, r, support));
        }
    }

    let (_, r, support) = best?;
    let lo = r.saturating_sub(window).max(min_r);
    let hi = (r + window).min(max_r);
    let weighted: f32 = (lo..=hi).map(|b| b as f32 * hist[b] as f32).sum();
    Some(weighted / support as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disk(h: usize, w: usize, cx: f32, cy: f32, r: f32) -> Array2<f32> {
        Array2::from_shape_fn((h, w), |(row, col)| {
            let dx = col as f32 - cx;
            let dy = row as f32 - cy;
            if dx * dx + dy * dy <= r * r { 255.0 } else { 0.0 }
        })
    }

    #[test]
    fn finds_a_single_disk() {
        let img = disk(160, 200, 90.0, 70.0, 40.0);
        let circles = HoughCircleDetector::default().detect(&img);
        assert_eq!(circles.len(), 1);
        let c = circles[0].to_estimate();
        assert!((c.x - 90).abs() <= 1, "x={}", c.x);
        assert!((c.y - 70).abs() <= 1, "y={}", c.y);
        assert!((c.radius as i32 - 40).abs() <= 2, "r={}", c.radius);
    }

    #[test]
    fn blank_frame_has_no_circles() {
        let img = Array2::<f32>::zeros((64, 64));
        assert!(HoughCircleDetector::default().detect(&img).is_empty());
    }

    #[test]
    fn radius_bounds_exclude_the_disk() {
        let img = disk(120, 120, 60.0, 60.0, 30.0);
        let params = HoughParams {
            min_radius: 45,
            max_radius: 55,
            ..Default::default()
        };
        assert!(HoughCircleDetector::new(params).detect(&img).is_empty());
    }

    #[test]
    fn oversized_max_radius_acts_as_unbounded() {
        let img = disk(100, 100, 50.0, 50.0, 25.0);
        let bounded = HoughCircleDetector::new(HoughParams {
            max_radius: 2_000_000_000,
            ..Default::default()
        });
        assert_eq!(bounded.radius_range(100, 100), (1, 100));
        let found = bounded.detect(&img);
        assert_eq!(found, HoughCircleDetector::default().detect(&img));
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn min_radius_beyond_frame_finds_nothing() {
        let img = disk(100, 100, 50.0, 50.0, 25.0);
        let params = HoughParams {
            min_radius: 4_000_000_000,
            ..Default::default()
        };
        assert!(HoughCircleDetector::new(params).detect(&img).is_empty());
    }

    #[test]
    fn small_min_dist_allows_two_disks() {
        let mut img = disk(120, 260, 60.0, 60.0, 35.0);
        let second = disk(120, 260, 190.0, 60.0, 35.0);
        img.zip_mut_with(&second, |a, &b| *a = a.max(b));
        let params = HoughParams {
            min_dist: 60.0,
            ..Default::default()
        };
        let circles = HoughCircleDetector::new(params).detect(&img);
        assert_eq!(circles.len(), 2);
        assert!(circles[0].votes >= circles[1].votes);
    }

    #[test]
    fn estimate_rounds_to_nearest_pixel() {
        let c = DetectedCircle {
            x: 1.6,
            y: 2.4,
            radius: 3.5,
            votes: 9,
        };
        assert_eq!(c.to_estimate(), CircleEstimate::new(2, 2, 4));
    }
}
