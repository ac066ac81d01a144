use ndarray::{Array2, Zip};

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Horizontal and vertical Sobel derivatives.
pub struct Gradients {
    /// d/dx (along columns).
    pub gx: Array2<f32>,
    /// d/dy (along rows).
    pub gy: Array2<f32>,
}

impl Gradients {
    /// L1 magnitude, the measure used for edge thresholds.
    pub fn l1_magnitude(&self) -> Array2<f32> {
        let mut mag = Array2::<f32>::zeros(self.gx.dim());
        Zip::from(&mut mag)
            .and(&self.gx)
            .and(&self.gy)
            .for_each(|m, &x, &y| *m = x.abs() + y.abs());
        mag
    }
}

/// 3x3 Sobel operator with edge-replicated borders.
pub fn sobel(data: &Array2<f32>) -> Gradients {
    let (h, w) = data.dim();
    let at = |r: isize, c: isize| -> f32 {
        let r = r.clamp(0, h as isize - 1) as usize;
        let c = c.clamp(0, w as isize - 1) as usize;
        data[[r, c]]
    };

    let mut gx = Array2::<f32>::zeros((h, w));
    let mut gy = Array2::<f32>::zeros((h, w));
    let zip = Zip::indexed(&mut gx).and(&mut gy);
    let kernel = |(row, col): (usize, usize), dx: &mut f32, dy: &mut f32| {
        let (r, c) = (row as isize, col as isize);
        *dx = (at(r - 1, c + 1) + 2.0 * at(r, c + 1) + at(r + 1, c + 1))
            - (at(r - 1, c - 1) + 2.0 * at(r, c - 1) + at(r + 1, c - 1));
        *dy = (at(r + 1, c - 1) + 2.0 * at(r + 1, c) + at(r + 1, c + 1))
            - (at(r - 1, c - 1) + 2.0 * at(r - 1, c) + at(r - 1, c + 1));
    };
    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        zip.par_for_each(kernel);
    } else {
        zip.for_each(kernel);
    }

    Gradients { gx, gy }
}
