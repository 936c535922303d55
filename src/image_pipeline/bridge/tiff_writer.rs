use std::io::Cursor;

use tiff::encoder::{colortype, compression::DeflateLevel, Compression, TiffEncoder};
use tiff::tags::Predictor;
use tracing::debug;

use crate::image_pipeline::bridge::types::{OutputConfig, TiffCompression};
use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raw::types::{ColorMode, PixelTensor};

/// Encodes `image` as a single-page 8-bit TIFF.
///
/// TIFF has no grayscale+alpha colour type here, so such images are widened to RGBA.
pub fn encode_tiff(image: &PixelTensor, config: &OutputConfig) -> Result<Vec<u8>> {
    debug!("Encoding TIFF image: {}x{}", image.width(), image.height());

    let width = u32::try_from(image.width())
        .map_err(|_| ConversionError::InvalidDimensions(image.width(), image.height()))?;
    let height = u32::try_from(image.height())
        .map_err(|_| ConversionError::InvalidDimensions(image.width(), image.height()))?;

    let compression = match config.compression {
        TiffCompression::None => Compression::Uncompressed,
        TiffCompression::Lzw => Compression::Lzw,
        TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
        TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
        TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
    };

    let mut buffer = Vec::new();
    {
        let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer))
            .map_err(|e| ConversionError::EncodeError(e.to_string()))?
            .with_compression(compression);

        if let Some(predictor_val) = config.predictor {
            let predictor = match predictor_val {
                2 => Predictor::Horizontal,
                _ => Predictor::None,
            };
            encoder = encoder.with_predictor(predictor);
        }

        let written = match image.mode()? {
            ColorMode::Gray => {
                encoder.write_image::<colortype::Gray8>(width, height, image.data())
            }
            ColorMode::Rgb => encoder.write_image::<colortype::RGB8>(width, height, image.data()),
            ColorMode::Rgba => {
                encoder.write_image::<colortype::RGBA8>(width, height, image.data())
            }
            ColorMode::GrayAlpha => {
                let rgba = image.to_rgba(u8::MAX)?;
                encoder.write_image::<colortype::RGBA8>(width, height, rgba.data())
            }
        };
        written.map_err(|e| ConversionError::EncodeError(e.to_string()))?;
    }

    debug!("TIFF encoding complete");
    Ok(buffer)
}
