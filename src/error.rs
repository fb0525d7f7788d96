use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = VisionError> = std::result::Result<T, E>;

/// Every failure the crate can report.
///
/// Lookups and constructors return these directly. The annotation loop catches them per
/// record, logs them and moves on to the next detection.
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("invalid hex color '{0}', expected 6 hex digits with an optional leading '#'")]
    InvalidColorFormat(String),

    #[error("index {index} is out of range for a collection of length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("cannot compute the bounding box of an empty polygon")]
    EmptyPolygon,

    #[error("file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("unsupported color input: {0}")]
    UnsupportedColorInput(String),

    #[error("attribute '{attribute}' has length {found}, expected {expected}")]
    LengthMismatch {
        attribute: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("boxes must have shape (n, 4), found (n, {0})")]
    InvalidBoxShape(usize),

    #[error("invalid box: {0}")]
    InvalidBox(String),

    #[error("malformed box coordinates ({0}, {1}, {2}, {3})")]
    MalformedBox(f64, f64, f64, f64),

    #[error("image scale must have positive dimensions, found height={height} width={width}")]
    InvalidScale { height: u32, width: u32 },

    #[error("flat coordinate sequence has odd length {0}")]
    OddCoordinateCount(usize),

    #[error("malformed label on line {line}: {reason}")]
    MalformedLabelLine { line: usize, reason: String },

    #[error("invalid font data: {0}")]
    InvalidFont(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
