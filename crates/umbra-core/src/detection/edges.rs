use std::collections::VecDeque;

use ndarray::Array2;

use crate::filters::sobel::{sobel, Gradients};

/// tan(22.5°) and tan(67.5°), the sector bounds for gradient direction.
const TAN_22_5: f32 = 0.414_213_57;
const TAN_67_5: f32 = 2.414_213_6;

/// Thin edges of a grayscale image and the gradient field they came from.
pub struct EdgeMap {
    /// Edge pixels as `(row, col)`, in raster order.
    pub points: Vec<(usize, usize)>,
    pub gradients: Gradients,
}

/// Canny edge detection: Sobel gradients, non-maximum suppression along the
/// gradient direction, then hysteresis between `high / 2` and `high`.
///
/// Pixels on the one-pixel image border never become edges.
pub fn canny(data: &Array2<f32>, high: f32) -> EdgeMap {
    let (h, w) = data.dim();
    let gradients = sobel(data);
    let low = high / 2.0;
    if h < 3 || w < 3 {
        return EdgeMap {
            points: Vec::new(),
            gradients,
        };
    }

    let mag = gradients.l1_magnitude();

    // 0 = suppressed, 1 = weak candidate, 2 = strong.
    let mut class = Array2::<u8>::zeros((h, w));
    let mut queue = VecDeque::new();

    for row in 1..h - 1 {
        for col in 1..w - 1 {
            let m = mag[[row, col]];
            if m <= low {
                continue;
            }
            let gx = gradients.gx[[row, col]];
            let gy = gradients.gy[[row, col]];
            let (ax, ay) = (gx.abs(), gy.abs());

            // `before` is compared strictly so a flat ridge keeps exactly one pixel.
            let (before, after) = if ay <= ax * TAN_22_5 {
                (mag[[row, col - 1]], mag[[row, col + 1]])
            } else if ay >= ax * TAN_67_5 {
                (mag[[row - 1, col]], mag[[row + 1, col]])
            } else if (gx > 0.0) == (gy > 0.0) {
                (mag[[row - 1, col - 1]], mag[[row + 1, col + 1]])
            } else {
                (mag[[row - 1, col + 1]], mag[[row + 1, col - 1]])
            };

            if m > before && m >= after {
                if m > high {
                    class[[row, col]] = 2;
                    queue.push_back((row, col));
                } else {
                    class[[row, col]] = 1;
                }
            }
        }
    }

    // Promote weak pixels 8-connected to a strong one.
    while let Some((row, col)) = queue.pop_front() {
        for nr in row - 1..=row + 1 {
            for nc in col - 1..=col + 1 {
                if class[[nr, nc]] == 1 {
                    class[[nr, nc]] = 2;
                    queue.push_back((nr, nc));
                }
            }
        }
    }

    let points = class
        .indexed_iter()
        .filter(|&(_, &c)| c == 2)
        .map(|(idx, _)| idx)
        .collect();

    EdgeMap { points, gradients }
}
