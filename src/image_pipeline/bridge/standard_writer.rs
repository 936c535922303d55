use std::io::{Cursor, Write};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};
use tracing::debug;

use crate::image_pipeline::bridge::format::{ModeConversion, TargetFormat, mode_conversion};
use crate::image_pipeline::bridge::palette::encode_gif;
use crate::image_pipeline::bridge::tiff_writer::encode_tiff;
use crate::image_pipeline::bridge::types::OutputConfig;
use crate::image_pipeline::bridge::writer::ImageWriter;
use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raw::types::{ColorMode, PixelTensor};

/// Writes JPEG, PNG and BMP through `image`, TIFF through `tiff` and GIF through `gif`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardImageWriter;

impl ImageWriter for StandardImageWriter {
    fn write_image(
        &self,
        image: &PixelTensor,
        format: TargetFormat,
        output: &mut dyn Write,
        config: &OutputConfig,
    ) -> Result<()> {
        let mode = image.mode()?;
        let conversion = mode_conversion(mode, format);
        debug!(
            "Encoding {:?} {}x{} as {} ({:?})",
            mode,
            image.width(),
            image.height(),
            format,
            conversion
        );

        let opaque;
        let image = match conversion {
            ModeConversion::Opaque => {
                opaque = image.to_rgb()?;
                &opaque
            }
            ModeConversion::Keep | ModeConversion::Quantize => image,
        };

        let buffer = match format {
            TargetFormat::Gif => encode_gif(image, config.gif_speed)?,
            TargetFormat::Tiff => encode_tiff(image, config)?,
            TargetFormat::Jpeg | TargetFormat::Png | TargetFormat::Bmp => {
                encode_with_image(image, format, config)?
            }
        };

        output.write_all(&buffer)?;
        debug!("Wrote {} bytes of {}", buffer.len(), format);
        Ok(())
    }
}

/// Wraps a tensor in the matching `image` buffer type.
pub fn to_dynamic(image: &PixelTensor) -> Result<DynamicImage> {
    let invalid = || ConversionError::InvalidDimensions(image.width(), image.height());
    let width = u32::try_from(image.width()).map_err(|_| invalid())?;
    let height = u32::try_from(image.height()).map_err(|_| invalid())?;
    let data = image.data().to_vec();

    let dynamic = match image.mode()? {
        ColorMode::Gray => GrayImage::from_raw(width, height, data).map(DynamicImage::ImageLuma8),
        ColorMode::GrayAlpha => {
            GrayAlphaImage::from_raw(width, height, data).map(DynamicImage::ImageLumaA8)
        }
        ColorMode::Rgb => RgbImage::from_raw(width, height, data).map(DynamicImage::ImageRgb8),
        ColorMode::Rgba => RgbaImage::from_raw(width, height, data).map(DynamicImage::ImageRgba8),
    };
    dynamic.ok_or_else(invalid)
}

fn encode_with_image(image: &PixelTensor, format: TargetFormat, config: &OutputConfig) -> Result<Vec<u8>> {
    let dynamic = to_dynamic(image)?;
    let mut buffer = Cursor::new(Vec::new());

    let written = match format {
        TargetFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut buffer, config.jpeg_quality);
            dynamic.write_with_encoder(encoder)
        }
        other => dynamic.write_to(&mut buffer, other.image_format()),
    };
    written.map_err(|e| ConversionError::EncodeError(e.to_string()))?;

    Ok(buffer.into_inner())
}
