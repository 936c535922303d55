use thiserror::Error;

use crate::image_pipeline::config::ElementType;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Binary size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Invalid layout {0:?}: must be a permutation of C, H and W")]
    InvalidLayout(String),

    #[error("Invalid channel count {0}: only 1, 3 or 4 channels can be decoded")]
    InvalidChannelCount(usize),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Invalid rotation {0}: only 0, 90, 180 and 270 are supported")]
    InvalidRotation(i64),

    #[error("Unsupported channel count: {0}")]
    UnsupportedChannelCount(usize),

    /// An opened image whose colour type has no tensor layout (e.g. float
    /// samples on the image to bin path). This is the unsupported channel
    /// count case for decoded images; [`UnsupportedChannelCount`] covers tensors.
    ///
    /// [`UnsupportedChannelCount`]: ConversionError::UnsupportedChannelCount
    #[error("Unsupported image mode: {0}")]
    UnsupportedImageMode(String),

    #[error("Unsupported element type: {0}")]
    UnsupportedElementType(String),

    #[error("Invalid endianness {0:?}: expected \"little\" or \"big\"")]
    InvalidEndianness(String),

    #[error("Invalid channel order {0:?}: expected RGB, BGR or GRAY")]
    InvalidChannelOrder(String),

    #[error("Sample value {value} does not fit {element_type}")]
    SampleOutOfRange { value: f64, element_type: ElementType },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Failed to encode image: {0}")]
    EncodeError(String),

    #[error("Failed to serialize settings: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConversionError>;
