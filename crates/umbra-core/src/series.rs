use std::path::{Path, PathBuf};

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::consts::{PROFILE_TABLE_DECIMALS, RGB_TABLE_DECIMALS};
use crate::error::{Result, UmbraError};
use crate::frame::CircleEstimate;
use crate::io::table::write_table;

/// Which per-frame series a run computes and saves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesSelection {
    pub rgb: bool,
    pub rows: bool,
    pub cols: bool,
    pub angular: bool,
    pub radial: bool,
}

impl Default for SeriesSelection {
    fn default() -> Self {
        Self {
            rgb: true,
            rows: true,
            cols: true,
            angular: true,
            radial: true,
        }
    }
}

impl SeriesSelection {
    /// Tracking only.
    pub fn none() -> Self {
        Self {
            rgb: false,
            rows: false,
            cols: false,
            angular: false,
            radial: false,
        }
    }

    pub fn needs_polar(&self) -> bool {
        self.angular || self.radial
    }

    pub fn needs_channels(&self) -> bool {
        self.rgb || self.rows || self.cols
    }
}

/// One sampled frame's outputs. Series that were not computed are left empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameRecord {
    pub circle: Option<CircleEstimate>,
    pub rgb: Option<[f64; 3]>,
    pub rows: Option<Vec<f64>>,
    pub cols: Option<Vec<f64>>,
    pub angular: Option<Vec<f64>>,
    pub radial: Option<Vec<f64>>,
}

/// Ordered per-frame time series; index = sampled frame number.
#[derive(Clone, Debug, Default)]
pub struct SeriesStore {
    circles: Vec<CircleEstimate>,
    rgb: Vec<[f64; 3]>,
    rows: Vec<Vec<f64>>,
    cols: Vec<Vec<f64>>,
    angular: Vec<Vec<f64>>,
    radial: Vec<Vec<f64>>,
    frames: usize,
}

impl SeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one frame. Each series present in the record must have been
    /// present in every earlier record, so all series stay frame-aligned.
    pub fn push(&mut self, record: FrameRecord) -> Result<()> {
        let frame = self.frames;
        push_aligned("circles", &mut self.circles, record.circle, frame)?;
        push_aligned("rgb", &mut self.rgb, record.rgb, frame)?;
        push_aligned("rows", &mut self.rows, record.rows, frame)?;
        push_aligned("cols", &mut self.cols, record.cols, frame)?;
        push_aligned("angular", &mut self.angular, record.angular, frame)?;
        push_aligned("radial", &mut self.radial, record.radial, frame)?;
        self.frames += 1;
        Ok(())
    }

    pub fn frame_count(&self) -> usize {
        self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames == 0
    }

    pub fn circles(&self) -> &[CircleEstimate] {
        &self.circles
    }

    pub fn rgb(&self) -> &[[f64; 3]] {
        &self.rgb
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn cols(&self) -> &[Vec<f64>] {
        &self.cols
    }

    pub fn angular(&self) -> &[Vec<f64>] {
        &self.angular
    }

    pub fn radial(&self) -> &[Vec<f64>] {
        &self.radial
    }

    /// Circle track as a `frames x 3` array of `(x, y, radius)`.
    pub fn circles_array(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.circles.len(), 3), |(i, j)| {
            let c = &self.circles[i];
            match j {
                0 => c.x as f64,
                1 => c.y as f64,
                _ => c.radius as f64,
            }
        })
    }

    pub fn rgb_array(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.rgb.len(), 3), |(i, j)| self.rgb[i][j])
    }

    pub fn rows_array(&self) -> Result<Array2<f64>> {
        to_array("rows", &self.rows)
    }

    pub fn cols_array(&self) -> Result<Array2<f64>> {
        to_array("cols", &self.cols)
    }

    pub fn angular_array(&self) -> Result<Array2<f64>> {
        to_array("angular", &self.angular)
    }

    pub fn radial_array(&self) -> Result<Array2<f64>> {
        to_array("radial", &self.radial)
    }

    /// Write every non-empty series under `dir`. File names carry `stem`,
    /// except `circle_coords.txt`. Returns the written paths.
    pub fn save(&self, dir: &Path, stem: &str) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;
        let mut written = Vec::new();
        let mut emit = |name: String, rows: &[Vec<f64>], decimals: usize| -> Result<()> {
            let path = dir.join(name);
            write_table(&path, rows, decimals)?;
            written.push(path);
            Ok(())
        };

        if !self.circles.is_empty() {
            let rows: Vec<Vec<f64>> = self
                .circles
                .iter()
                .map(|c| vec![c.x as f64, c.y as f64, c.radius as f64])
                .collect();
            emit("circle_coords.txt".into(), &rows, 0)?;
        }
        if !self.rgb.is_empty() {
            let rows: Vec<Vec<f64>> = self.rgb.iter().map(|v| v.to_vec()).collect();
            emit(format!("rgb_{stem}.txt"), &rows, RGB_TABLE_DECIMALS)?;
            for (ch, name) in ["red", "green", "blue"].iter().enumerate() {
                let column: Vec<Vec<f64>> = self.rgb.iter().map(|v| vec![v[ch]]).collect();
                emit(format!("{name}_array_{stem}.txt"), &column, RGB_TABLE_DECIMALS)?;
            }
        }
        if !self.rows.is_empty() {
            emit(format!("y_array_{stem}.txt"), &self.rows, PROFILE_TABLE_DECIMALS)?;
        }
        if !self.cols.is_empty() {
            emit(format!("x_array_{stem}.txt"), &self.cols, PROFILE_TABLE_DECIMALS)?;
        }
        if !self.angular.is_empty() {
            emit(format!("angular_{stem}.txt"), &self.angular, PROFILE_TABLE_DECIMALS)?;
        }
        if !self.radial.is_empty() {
            emit(format!("radial_{stem}.txt"), &self.radial, PROFILE_TABLE_DECIMALS)?;
        }

        info!(files = written.len(), dir = %dir.display(), "Series saved");
        Ok(written)
    }
}

fn push_aligned<T>(name: &'static str, series: &mut Vec<T>, value: Option<T>, frame: usize) -> Result<()> {
    match value {
        Some(v) if series.len() == frame => {
            series.push(v);
            Ok(())
        }
        Some(_) => Err(UmbraError::Pipeline(format!(
            "series '{name}' started late at frame {frame}"
        ))),
        None if series.is_empty() => Ok(()),
        None => Err(UmbraError::Pipeline(format!(
            "series '{name}' missing at frame {frame}"
        ))),
    }
}

fn to_array(name: &'static str, rows: &[Vec<f64>]) -> Result<Array2<f64>> {
    let width = rows.first().map_or(0, Vec::len);
    if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
        return Err(UmbraError::RaggedSeries {
            series: name,
            row,
            found: r.len(),
            expected: width,
        });
    }
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((rows.len(), width), flat)
        .map_err(|e| UmbraError::Pipeline(format!("series '{name}': {e}")))
}
