//! Output configuration types

use tracing::warn;

use crate::image_pipeline::common::error::{ConversionError, Result};

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression (slow, good compression)
    Lzw,
    /// Deflate compression - fast level (good speed/size balance)
    DeflateFast,
    /// Deflate compression - best compression (slower)
    DeflateBest,
    /// Deflate compression - balanced
    DeflateBalanced,
}

/// Options for writing compressed images
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Compression method for TIFF output
    pub compression: TiffCompression,
    /// TIFF predictor (typically 2 for horizontal differencing)
    pub predictor: Option<u16>,
    /// JPEG quality, 1-100
    pub jpeg_quality: u8,
    /// GIF quantizer speed, 1 (best) to 30 (fastest)
    pub gif_speed: i32,
    /// Whether to validate image dimensions before writing
    pub validate_dimensions: bool,
    /// Largest accepted width or height when validating
    pub max_dimension: Option<usize>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            compression: TiffCompression::None,
            predictor: None,
            jpeg_quality: 75,
            gif_speed: 10,
            validate_dimensions: true,
            max_dimension: None,
        }
    }
}

impl OutputConfig {
    pub fn builder() -> OutputConfigBuilder {
        OutputConfigBuilder::default()
    }

    /// Rejects empty images and, when set, sides above `max_dimension`.
    ///
    /// Does nothing unless `validate_dimensions` is enabled.
    pub fn check_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(ConversionError::InvalidDimensions(width, height));
        }

        if let Some(max) = self.max_dimension {
            if width > max || height > max {
                warn!("Image dimensions {}x{} exceed maximum {}", width, height, max);
                return Err(ConversionError::InvalidDimensions(width, height));
            }
        }

        Ok(())
    }
}

/// Builder for OutputConfig
#[derive(Default)]
pub struct OutputConfigBuilder {
    compression: Option<TiffCompression>,
    predictor: Option<Option<u16>>,
    jpeg_quality: Option<u8>,
    gif_speed: Option<i32>,
    validate_dimensions: Option<bool>,
    max_dimension: Option<Option<usize>>,
}

impl OutputConfigBuilder {
    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn predictor(mut self, predictor: Option<u16>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = Some(quality.clamp(1, 100));
        self
    }

    pub fn gif_speed(mut self, speed: i32) -> Self {
        self.gif_speed = Some(speed.clamp(1, 30));
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn build(self) -> OutputConfig {
        let default = OutputConfig::default();
        OutputConfig {
            compression: self.compression.unwrap_or(default.compression),
            predictor: self.predictor.unwrap_or(default.predictor),
            jpeg_quality: self.jpeg_quality.unwrap_or(default.jpeg_quality),
            gif_speed: self.gif_speed.unwrap_or(default.gif_speed),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
        }
    }
}
