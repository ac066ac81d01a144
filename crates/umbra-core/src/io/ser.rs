use std::fs::File;
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt};
use memmap2::Mmap;
use ndarray::Array3;

use crate::consts::{COLOR_CHANNEL_COUNT, DEFAULT_SOURCE_FRAME_RATE, SER_TICKS_PER_SECOND};
use crate::error::{Result, UmbraError};
use crate::frame::{ColorMode, FrameMetadata, RgbFrame, SourceInfo};

use super::source::FrameSource;

pub const SER_HEADER_SIZE: usize = 178;
const SER_MAGIC: &[u8; 14] = b"LUCAM-RECORDER";

/// SER file header (178 bytes).
#[derive(Clone, Debug)]
pub struct SerHeader {
    pub color_id: i32,
    pub little_endian: bool,
    pub width: u32,
    pub height: u32,
    pub pixel_depth: u32,
    pub frame_count: u32,
    pub observer: String,
    pub instrument: String,
    pub telescope: String,
    pub date_time: u64,
    pub date_time_utc: u64,
}

impl SerHeader {
    /// Bytes per sample (1 for 8-bit, 2 for 9-16 bit).
    pub fn bytes_per_sample(&self) -> usize {
        if self.pixel_depth <= 8 { 1 } else { 2 }
    }

    /// Samples per pixel (1 for mono/bayer, 3 for RGB/BGR).
    pub fn planes_per_pixel(&self) -> usize {
        match self.color_id {
            100 | 101 => COLOR_CHANNEL_COUNT,
            _ => 1,
        }
    }

    pub fn frame_byte_size(&self) -> usize {
        self.width as usize * self.height as usize * self.bytes_per_sample() * self.planes_per_pixel()
    }

    pub fn color_mode(&self) -> ColorMode {
        match self.color_id {
            8 => ColorMode::BayerRGGB,
            9 => ColorMode::BayerGRBG,
            10 => ColorMode::BayerGBRG,
            11 => ColorMode::BayerBGGR,
            100 => ColorMode::RGB,
            101 => ColorMode::BGR,
            _ => ColorMode::Mono,
        }
    }
}

/// Memory-mapped SER video, decoded to 8-bit RGB frames on demand.
pub struct SerReader {
    mmap: Mmap,
    pub header: SerHeader,
    info: SourceInfo,
}

impl SerReader {
    /// Open a SER file. The frame rate is taken from the timestamp trailer when
    /// present, otherwise `DEFAULT_SOURCE_FRAME_RATE`.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_frame_rate(path, None)
    }

    /// Open a SER file, forcing the frame rate when `frame_rate` is set.
    pub fn open_with_frame_rate(path: &Path, frame_rate: Option<f64>) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < SER_HEADER_SIZE {
            return Err(UmbraError::InvalidSer("File too small for SER header".into()));
        }
        if &mmap[0..14] != SER_MAGIC {
            return Err(UmbraError::InvalidSer("Missing LUCAM-RECORDER magic".into()));
        }

        let header = parse_header(&mmap[..SER_HEADER_SIZE])?;
        let mode = header.color_mode();
        if !matches!(mode, ColorMode::Mono | ColorMode::RGB | ColorMode::BGR) {
            return Err(UmbraError::UnsupportedColorMode(format!(
                "{mode:?} data must be debayered before analysis"
            )));
        }
        if header.frame_count == 0 {
            return Err(UmbraError::EmptySequence);
        }

        let expected = SER_HEADER_SIZE + header.frame_byte_size() * header.frame_count as usize;
        if mmap.len() < expected {
            return Err(UmbraError::InvalidSer(format!(
                "File truncated: expected at least {} bytes, got {}",
                expected,
                mmap.len()
            )));
        }

        let frame_rate = frame_rate
            .or_else(|| trailer_frame_rate(&mmap, &header))
            .unwrap_or(DEFAULT_SOURCE_FRAME_RATE);
        let info = build_info(path.to_path_buf(), &header, frame_rate);

        Ok(Self { mmap, header, info })
    }

    /// Raw bytes of a single frame (zero-copy from the mmap).
    pub fn frame_raw(&self, index: usize) -> Result<&[u8]> {
        let total = self.header.frame_count as usize;
        if index >= total {
            return Err(UmbraError::FrameIndexOutOfRange { index, total });
        }
        let size = self.header.frame_byte_size();
        let offset = SER_HEADER_SIZE + index * size;
        Ok(&self.mmap[offset..offset + size])
    }

    /// Decode one frame to 8-bit RGB. Mono data is replicated into all three
    /// channels; deeper samples are shifted down to 8 bits.
    pub fn read_frame(&self, index: usize) -> Result<RgbFrame> {
        let raw = self.frame_raw(index)?;
        let h = self.header.height as usize;
        let w = self.header.width as usize;
        let planes = self.header.planes_per_pixel();
        let bps = self.header.bytes_per_sample();
        let shift = self.header.pixel_depth.saturating_sub(8);
        let le = self.header.little_endian;
        let swap_rb = self.header.color_mode() == ColorMode::BGR;

        let sample = |idx: usize| -> u8 {
            let v = if bps == 1 {
                raw[idx] as u16
            } else if le {
                u16::from_le_bytes([raw[idx], raw[idx + 1]])
            } else {
                u16::from_be_bytes([raw[idx], raw[idx + 1]])
            };
            (v >> shift).min(255) as u8
        };

        let data = Array3::from_shape_fn((h, w, COLOR_CHANNEL_COUNT), |(row, col, ch)| {
            let pixel = (row * w + col) * planes * bps;
            if planes == 1 {
                sample(pixel)
            } else {
                let plane = if swap_rb { COLOR_CHANNEL_COUNT - 1 - ch } else { ch };
                sample(pixel + plane * bps)
            }
        });

        let mut frame = RgbFrame::new(data)?;
        frame.metadata = FrameMetadata {
            frame_index: index,
            // 100 ns ticks to microseconds.
            timestamp_us: self.read_timestamp(index).map(|ticks| ticks / 10),
        };
        Ok(frame)
    }

    /// Per-frame timestamp from the optional trailer, in SER ticks.
    pub fn read_timestamp(&self, index: usize) -> Option<u64> {
        read_trailer_timestamp(&self.mmap, &self.header, index)
    }
}

impl FrameSource for SerReader {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn frame_at(&self, index: usize) -> Result<RgbFrame> {
        self.read_frame(index)
    }
}

fn read_trailer_timestamp(mmap: &[u8], header: &SerHeader, index: usize) -> Option<u64> {
    let trailer = SER_HEADER_SIZE + header.frame_byte_size() * header.frame_count as usize;
    let offset = trailer + index * 8;
    let bytes = mmap.get(offset..offset + 8)?;
    Some(u64::from_le_bytes(bytes.try_into().ok()?))
}

/// Frame rate implied by the first and last trailer timestamps.
fn trailer_frame_rate(mmap: &[u8], header: &SerHeader) -> Option<f64> {
    let n = header.frame_count as usize;
    if n < 2 {
        return None;
    }
    let first = read_trailer_timestamp(mmap, header, 0)?;
    let last = read_trailer_timestamp(mmap, header, n - 1)?;
    if last <= first {
        return None;
    }
    let seconds = (last - first) as f64 / SER_TICKS_PER_SECOND;
    Some((n - 1) as f64 / seconds)
}

fn build_info(filename: PathBuf, header: &SerHeader, frame_rate: f64) -> SourceInfo {
    SourceInfo {
        filename,
        total_frames: header.frame_count as usize,
        width: header.width,
        height: header.height,
        bit_depth: header.pixel_depth as u8,
        color_mode: header.color_mode(),
        frame_rate,
        observer: non_empty(&header.observer),
        telescope: non_empty(&header.telescope),
        instrument: non_empty(&header.instrument),
    }
}

fn parse_header(buf: &[u8]) -> Result<SerHeader> {
    let mut cursor = std::io::Cursor::new(&buf[14..]);

    let _lu_id = cursor.read_i32::<LittleEndian>()?;
    let color_id = cursor.read_i32::<LittleEndian>()?;
    let le_flag = cursor.read_i32::<LittleEndian>()?;
    let width = cursor.read_i32::<LittleEndian>()?;
    let height = cursor.read_i32::<LittleEndian>()?;
    let pixel_depth = cursor.read_i32::<LittleEndian>()?;
    let frame_count = cursor.read_i32::<LittleEndian>()?;

    let observer = read_fixed_string(&buf[42..82]);
    let instrument = read_fixed_string(&buf[82..122]);
    let telescope = read_fixed_string(&buf[122..162]);

    let mut cursor = std::io::Cursor::new(&buf[162..]);
    let date_time = cursor.read_u64::<LittleEndian>()?;
    let date_time_utc = cursor.read_u64::<LittleEndian>()?;

    if width <= 0 || height <= 0 {
        return Err(UmbraError::InvalidDimensions {
            width: width.max(0) as u32,
            height: height.max(0) as u32,
        });
    }
    if !(1..=16).contains(&pixel_depth) {
        return Err(UmbraError::InvalidSer(format!(
            "Unsupported pixel depth {pixel_depth}"
        )));
    }
    if frame_count < 0 {
        return Err(UmbraError::InvalidSer(format!(
            "Negative frame count {frame_count}"
        )));
    }

    // Treat 0 as little-endian, as most capture software writes it.
    let little_endian = le_flag != 1;

    Ok(SerHeader {
        color_id,
        little_endian,
        width: width as u32,
        height: height as u32,
        pixel_depth: pixel_depth as u32,
        frame_count: frame_count as u32,
        observer,
        instrument,
        telescope,
        date_time,
        date_time_utc,
    })
}

fn read_fixed_string(buf: &[u8]) -> String {
    String::from_utf8_lossy(buf)
        .trim_end_matches('\0')
        .trim()
        .to_string()
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() { None } else { Some(s.to_string()) }
}
