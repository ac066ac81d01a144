use ndarray::{Array2, Axis, Zip};

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Separable Gaussian blur with edge-replicated borders.
/// A non-positive or NaN `sigma` returns the input unchanged.
pub fn gaussian_blur(data: &Array2<f32>, sigma: f32) -> Array2<f32> {
    if sigma.is_nan() || sigma <= 0.0 {
        return data.clone();
    }
    let (h, w) = data.dim();
    let kernel = gaussian_kernel(sigma, h.max(w));
    let horizontal = convolve_axis(data, &kernel, Axis(1));
    convolve_axis(&horizontal, &kernel, Axis(0))
}

/// Kernel of radius `3 * sigma`, capped at `max_radius` taps each side.
fn gaussian_kernel(sigma: f32, max_radius: usize) -> Vec<f32> {
    let radius = (sigma * 3.0).ceil().min(max_radius as f32) as isize;
    let s2 = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (-radius..=radius)
        .map(|x| (-(x * x) as f32 / s2).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    kernel.iter_mut().for_each(|k| *k /= sum);
    kernel
}

/// 1D convolution along `axis` (Axis(1) = along rows, Axis(0) = along columns).
fn convolve_axis(data: &Array2<f32>, kernel: &[f32], axis: Axis) -> Array2<f32> {
    let (h, w) = data.dim();
    let radius = (kernel.len() / 2) as isize;
    let along_rows = axis == Axis(1);
    let len = (if along_rows { w } else { h }) as isize;

    let tap = |row: usize, col: usize| -> f32 {
        let base = (if along_rows { col } else { row }) as isize;
        kernel
            .iter()
            .enumerate()
            .map(|(k, &kv)| {
                let src = (base + k as isize - radius).clamp(0, len - 1) as usize;
                let v = if along_rows { data[[row, src]] } else { data[[src, col]] };
                v * kv
            })
            .sum()
    };

    let mut out = Array2::<f32>::zeros((h, w));
    let zip = Zip::indexed(&mut out);
    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        zip.par_for_each(|(row, col), v| *v = tap(row, col));
    } else {
        zip.for_each(|(row, col), v| *v = tap(row, col));
    }
    out
}
