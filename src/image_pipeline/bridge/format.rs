//! Compressed target formats and the mode compatibility rule

use std::fmt;
use std::str::FromStr;

use image::ImageFormat;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raw::types::ColorMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    Jpeg,
    Png,
    Bmp,
    Tiff,
    Gif,
}

impl TargetFormat {
    pub const ALL: [TargetFormat; 5] = [
        TargetFormat::Jpeg,
        TargetFormat::Png,
        TargetFormat::Bmp,
        TargetFormat::Tiff,
        TargetFormat::Gif,
    ];

    /// Lower-case extension used for output files.
    pub fn extension(self) -> &'static str {
        match self {
            TargetFormat::Jpeg => "jpeg",
            TargetFormat::Png => "png",
            TargetFormat::Bmp => "bmp",
            TargetFormat::Tiff => "tiff",
            TargetFormat::Gif => "gif",
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            TargetFormat::Jpeg => ImageFormat::Jpeg,
            TargetFormat::Png => ImageFormat::Png,
            TargetFormat::Bmp => ImageFormat::Bmp,
            TargetFormat::Tiff => ImageFormat::Tiff,
            TargetFormat::Gif => ImageFormat::Gif,
        }
    }

    pub fn supports_alpha(self) -> bool {
        !matches!(self, TargetFormat::Jpeg)
    }

    /// Formats that only store palette or grayscale pixels.
    pub fn palette_only(self) -> bool {
        matches!(self, TargetFormat::Gif)
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension().to_ascii_uppercase())
    }
}

impl FromStr for TargetFormat {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(TargetFormat::Jpeg),
            "png" => Ok(TargetFormat::Png),
            "bmp" => Ok(TargetFormat::Bmp),
            "tif" | "tiff" => Ok(TargetFormat::Tiff),
            "gif" => Ok(TargetFormat::Gif),
            _ => Err(ConversionError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// What has to happen to a source before it can be stored in a target format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeConversion {
    Keep,
    /// Drop alpha and store opaque RGB
    Opaque,
    /// Reduce full colour to a palette
    Quantize,
}

pub fn mode_conversion(mode: ColorMode, target: TargetFormat) -> ModeConversion {
    if !target.supports_alpha() && mode.has_alpha() {
        ModeConversion::Opaque
    } else if target.palette_only() && mode != ColorMode::Gray {
        ModeConversion::Quantize
    } else {
        ModeConversion::Keep
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target_format() {
        assert_eq!("JPG".parse::<TargetFormat>().unwrap(), TargetFormat::Jpeg);
        assert_eq!("jpeg".parse::<TargetFormat>().unwrap(), TargetFormat::Jpeg);
        assert_eq!(".tif".parse::<TargetFormat>().unwrap(), TargetFormat::Tiff);
        assert_eq!("Gif".parse::<TargetFormat>().unwrap(), TargetFormat::Gif);
        assert!(matches!(
            "webp".parse::<TargetFormat>(),
            Err(ConversionError::UnsupportedFormat(_))
        ));
        assert_eq!(TargetFormat::Jpeg.extension(), "jpeg");
        assert_eq!(TargetFormat::Tiff.to_string(), "TIFF");
    }

    #[test]
    fn test_jpeg_drops_alpha() {
        assert_eq!(mode_conversion(ColorMode::Rgba, TargetFormat::Jpeg), ModeConversion::Opaque);
        assert_eq!(
            mode_conversion(ColorMode::GrayAlpha, TargetFormat::Jpeg),
            ModeConversion::Opaque
        );
        assert_eq!(mode_conversion(ColorMode::Rgb, TargetFormat::Jpeg), ModeConversion::Keep);
        assert_eq!(mode_conversion(ColorMode::Gray, TargetFormat::Jpeg), ModeConversion::Keep);
    }

    #[test]
    fn test_gif_quantizes_colour() {
        assert_eq!(mode_conversion(ColorMode::Rgb, TargetFormat::Gif), ModeConversion::Quantize);
        assert_eq!(mode_conversion(ColorMode::Rgba, TargetFormat::Gif), ModeConversion::Quantize);
        assert_eq!(
            mode_conversion(ColorMode::GrayAlpha, TargetFormat::Gif),
            ModeConversion::Quantize
        );
        assert_eq!(mode_conversion(ColorMode::Gray, TargetFormat::Gif), ModeConversion::Keep);
    }

    #[test]
    fn test_lossless_formats_keep_mode() {
        for target in [TargetFormat::Png, TargetFormat::Bmp, TargetFormat::Tiff] {
            for mode in [ColorMode::Gray, ColorMode::GrayAlpha, ColorMode::Rgb, ColorMode::Rgba] {
                assert_eq!(mode_conversion(mode, target), ModeConversion::Keep);
            }
        }
    }
}
