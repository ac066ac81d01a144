#![allow(dead_code)]

use ndarray::Array3;
use umbra_core::frame::RgbFrame;
use umbra_core::io::ser::SER_HEADER_SIZE;

/// Build a SER file header with configurable bit depth and color mode.
///
/// `color_id`: 0=MONO, 8=BAYER_RGGB, 100=RGB, 101=BGR
pub fn build_ser_header_full(
    width: u32,
    height: u32,
    bit_depth: u32,
    num_frames: usize,
    color_id: i32,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(SER_HEADER_SIZE);

    buf.extend_from_slice(b"LUCAM-RECORDER");
    // LuID
    buf.extend_from_slice(&0i32.to_le_bytes());
    buf.extend_from_slice(&color_id.to_le_bytes());
    // LittleEndian = 0
    buf.extend_from_slice(&0i32.to_le_bytes());
    buf.extend_from_slice(&(width as i32).to_le_bytes());
    buf.extend_from_slice(&(height as i32).to_le_bytes());
    buf.extend_from_slice(&(bit_depth as i32).to_le_bytes());
    buf.extend_from_slice(&(num_frames as i32).to_le_bytes());
    // Observer
    let mut observer = [0u8; 40];
    observer[..7].copy_from_slice(b"Eclipse");
    buf.extend_from_slice(&observer);
    // Instrument, Telescope
    buf.extend_from_slice(&[0u8; 40]);
    buf.extend_from_slice(&[0u8; 40]);
    // DateTime, DateTimeUTC
    buf.extend_from_slice(&0u64.to_le_bytes());
    buf.extend_from_slice(&0u64.to_le_bytes());

    assert_eq!(buf.len(), SER_HEADER_SIZE);
    buf
}

/// Complete 8-bit SER file: header followed by the given frames.
pub fn build_ser_with_frames(width: u32, height: u32, color_id: i32, frames: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = build_ser_header_full(width, height, 8, frames.len(), color_id);
    for frame in frames {
        buf.extend_from_slice(frame);
    }
    buf
}

/// Append a timestamp trailer with frames `interval_ticks` apart.
pub fn append_trailer(buf: &mut Vec<u8>, frames: usize, interval_ticks: u64) {
    let start = 638_000_000_000_000_000u64;
    for i in 0..frames as u64 {
        buf.extend_from_slice(&(start + i * interval_ticks).to_le_bytes());
    }
}

/// Write a SER buffer to a temporary `.ser` file.
///
/// The file stays alive as long as the returned `NamedTempFile` is not dropped.
pub fn write_test_ser(data: &[u8]) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut f = tempfile::Builder::new()
        .suffix(".ser")
        .tempfile()
        .expect("create temp file");
    f.write_all(data).expect("write SER data");
    f.flush().expect("flush");
    f
}

/// Mono 8-bit frame bytes with a filled disk of `value` on black.
pub fn disk_bytes(width: usize, height: usize, cx: f64, cy: f64, r: f64, value: u8) -> Vec<u8> {
    let mut out = vec![0u8; width * height];
    for row in 0..height {
        for col in 0..width {
            let (dx, dy) = (col as f64 - cx, row as f64 - cy);
            if dx * dx + dy * dy <= r * r {
                out[row * width + col] = value;
            }
        }
    }
    out
}

/// RGB frame with a filled disk of color `rgb` on black.
pub fn disk_frame(width: usize, height: usize, cx: f64, cy: f64, r: f64, rgb: [u8; 3]) -> RgbFrame {
    let data = Array3::from_shape_fn((height, width, 3), |(row, col, ch)| {
        let (dx, dy) = (col as f64 - cx, row as f64 - cy);
        if dx * dx + dy * dy <= r * r { rgb[ch] } else { 0 }
    });
    RgbFrame::new(data).expect("valid frame")
}

/// RGB frame whose value at every pixel is `f(row, col)` in all channels.
pub fn gray_frame(width: usize, height: usize, f: impl Fn(usize, usize) -> u8) -> RgbFrame {
    let data = Array3::from_shape_fn((height, width, 3), |(row, col, _)| f(row, col));
    RgbFrame::new(data).expect("valid frame")
}
