use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{Result, UmbraError};

/// How a profile axis is reduced by a compression factor `c`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SamplingStrategy {
    /// Keep only axis values divisible by `c`, dropping the rest.
    #[default]
    Stride,
    /// Average consecutive blocks of `c` axis values.
    BlockAverage,
}

impl std::fmt::Display for SamplingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stride => write!(f, "Stride"),
            Self::BlockAverage => write!(f, "Block Average"),
        }
    }
}

pub fn check_compression(compress: usize) -> Result<()> {
    if compress == 0 {
        return Err(UmbraError::InvalidParameter(
            "compression factor must be at least 1".into(),
        ));
    }
    Ok(())
}

/// Split the axis values `axis` into the groups that each yield one output value.
///
/// With `Stride` every group holds a single value `v` with `v % compress == 0`;
/// with `BlockAverage` the axis is cut into consecutive blocks of `compress`
/// values, the last one possibly shorter.
pub fn axis_groups(
    axis: Range<usize>,
    compress: usize,
    strategy: SamplingStrategy,
) -> Result<Vec<Range<usize>>> {
    check_compression(compress)?;
    let groups = match strategy {
        SamplingStrategy::Stride => axis
            .filter(|v| v % compress == 0)
            .map(|v| v..v + 1)
            .collect(),
        SamplingStrategy::BlockAverage => axis
            .clone()
            .step_by(compress)
            .map(|start| start..(start + compress).min(axis.end))
            .collect(),
    };
    Ok(groups)
}

/// Axis value that labels each group (its first value).
pub fn group_positions(groups: &[Range<usize>]) -> Vec<usize> {
    groups.iter().map(|g| g.start).collect()
}

/// Mean of `value(v)` over a group of axis values.
pub fn group_mean(group: Range<usize>, value: impl Fn(usize) -> f64) -> f64 {
    let n = group.len();
    if n == 0 {
        return 0.0;
    }
    group.map(value).sum::<f64>() / n as f64
}
