mod common;

use approx::assert_abs_diff_eq;
use umbra_core::error::UmbraError;
use umbra_core::frame::RgbFrame;
use umbra_core::profile::channels::{col_positions, col_profile, mean_rgb, row_positions, row_profile};
use umbra_core::profile::{ChannelConfig, ChannelProfiles, SamplingStrategy};

use common::gray_frame;

#[test]
fn test_constant_frame_mean_rgb_is_exact() {
    for (w, h) in [(1, 1), (7, 3), (64, 48), (301, 17)] {
        let frame = RgbFrame::solid(w, h, [50, 100, 200]).unwrap();
        assert_eq!(mean_rgb(&frame), [50.0, 100.0, 200.0], "{w}x{h}");
    }
}

#[test]
fn test_row_profile_stride_and_block() {
    // Row r has value 10 * r.
    let frame = gray_frame(5, 10, |row, _| (row * 10) as u8);

    let all = row_profile(&frame, 1, SamplingStrategy::Stride).unwrap();
    assert_eq!(all.len(), 10);
    assert_abs_diff_eq!(all[7], 70.0);

    let stride = row_profile(&frame, 3, SamplingStrategy::Stride).unwrap();
    assert_eq!(stride, vec![0.0, 30.0, 60.0, 90.0]);

    let block = row_profile(&frame, 3, SamplingStrategy::BlockAverage).unwrap();
    assert_eq!(block.len(), 4);
    assert_abs_diff_eq!(block[0], 10.0);
    assert_abs_diff_eq!(block[1], 40.0);
    assert_abs_diff_eq!(block[2], 70.0);
    assert_abs_diff_eq!(block[3], 90.0);
}

#[test]
fn test_col_profile_averages_over_rows() {
    // Column c has value c in the top half and 3 * c in the bottom half.
    let frame = gray_frame(8, 4, |row, col| if row < 2 { col as u8 } else { (3 * col) as u8 });
    let cols = col_profile(&frame, 1, SamplingStrategy::Stride).unwrap();
    assert_eq!(cols.len(), 8);
    for (c, v) in cols.iter().enumerate() {
        assert_abs_diff_eq!(*v, 2.0 * c as f64, epsilon = 1e-12);
    }
}

#[test]
fn test_compute_bundles_all_profiles() {
    let frame = gray_frame(12, 6, |row, col| (row + col) as u8);
    let config = ChannelConfig {
        compress: 2,
        strategy: SamplingStrategy::Stride,
    };
    let profiles = ChannelProfiles::compute(&frame, &config).unwrap();
    assert_eq!(profiles.rows.len(), 3);
    assert_eq!(profiles.cols.len(), 6);
    assert_abs_diff_eq!(profiles.mean_rgb[0], 8.0, epsilon = 1e-12);
}

#[test]
fn test_zero_compression_is_rejected() {
    let frame = RgbFrame::solid(4, 4, [1, 2, 3]).unwrap();
    let err = row_profile(&frame, 0, SamplingStrategy::Stride).unwrap_err();
    assert!(matches!(err, UmbraError::InvalidParameter(_)));
}

#[test]
fn test_positions_label_row_and_column_values() {
    let frame = gray_frame(7, 10, |row, col| (row + col) as u8);

    let rows = row_profile(&frame, 3, SamplingStrategy::Stride).unwrap();
    let at = row_positions(frame.height(), 3, SamplingStrategy::Stride).unwrap();
    assert_eq!(at, vec![0, 3, 6, 9]);
    assert_eq!(at.len(), rows.len());

    let cols = col_profile(&frame, 2, SamplingStrategy::BlockAverage).unwrap();
    let at = col_positions(frame.width(), 2, SamplingStrategy::BlockAverage).unwrap();
    assert_eq!(at, vec![0, 2, 4, 6]);
    assert_eq!(at.len(), cols.len());

    assert!(row_positions(10, 0, SamplingStrategy::Stride).is_err());
}
