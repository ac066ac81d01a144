use thiserror::Error;

#[derive(Error, Debug)]
pub enum UmbraError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid SER file: {0}")]
    InvalidSer(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Frame index {index} out of range (total: {total})")]
    FrameIndexOutOfRange { index: usize, total: usize },

    #[error("Unsupported color mode: {0}")]
    UnsupportedColorMode(String),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Empty frame sequence")]
    EmptySequence,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Sample ({x}, {y}) outside frame {width}x{height}")]
    SampleOutOfBounds {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    #[error("Invalid table at line {line}: {reason}")]
    InvalidTable { line: usize, reason: String },

    #[error("Series '{series}' is ragged: row {row} has {found} values, expected {expected}")]
    RaggedSeries {
        series: &'static str,
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

pub type Result<T> = std::result::Result<T, UmbraError>;
