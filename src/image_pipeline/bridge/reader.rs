//! Compressed image → tensor conversion

use image::{ColorType, DynamicImage, GenericImageView};
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raw::types::PixelTensor;

/// Decodes any supported compressed image held in memory.
pub fn load_image(data: &[u8]) -> Result<DynamicImage> {
    let image =
        image::load_from_memory(data).map_err(|e| ConversionError::DecodeError(e.to_string()))?;
    debug!("Loaded {:?} image {}x{}", image.color(), image.width(), image.height());
    Ok(image)
}

/// Decodes a compressed image into the canonical 8-bit tensor.
pub fn to_tensor(data: &[u8]) -> Result<PixelTensor> {
    tensor_from_dynamic(&load_image(data)?)
}

/// 8-bit tensor of `image`; deeper samples are reduced by the codec library.
pub fn tensor_from_dynamic(image: &DynamicImage) -> Result<PixelTensor> {
    let (width, height) = (image.width(), image.height());
    let (channels, data) = match image.color() {
        ColorType::L8 | ColorType::L16 => (1, image.to_luma8().into_raw()),
        ColorType::La8 | ColorType::La16 => (2, image.to_luma_alpha8().into_raw()),
        ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => (3, image.to_rgb8().into_raw()),
        ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => {
            (4, image.to_rgba8().into_raw())
        }
        other => return Err(ConversionError::UnsupportedImageMode(format!("{:?}", other))),
    };
    PixelTensor::new(height as usize, width as usize, channels, data)
}

/// Decodes a compressed image keeping up to 16 bits per sample.
pub fn open_samples(data: &[u8]) -> Result<PixelTensor<u16>> {
    samples_from_dynamic(load_image(data)?)
}

pub fn samples_from_dynamic(image: DynamicImage) -> Result<PixelTensor<u16>> {
    fn widen(width: u32, height: u32, channels: usize, raw: Vec<u8>) -> Result<PixelTensor<u16>> {
        let data = raw.into_iter().map(u16::from).collect();
        PixelTensor::new(height as usize, width as usize, channels, data)
    }
    fn keep(width: u32, height: u32, channels: usize, raw: Vec<u16>) -> Result<PixelTensor<u16>> {
        PixelTensor::new(height as usize, width as usize, channels, raw)
    }

    let (width, height) = (image.width(), image.height());
    match image {
        DynamicImage::ImageLuma8(buf) => widen(width, height, 1, buf.into_raw()),
        DynamicImage::ImageLumaA8(buf) => widen(width, height, 2, buf.into_raw()),
        DynamicImage::ImageRgb8(buf) => widen(width, height, 3, buf.into_raw()),
        DynamicImage::ImageRgba8(buf) => widen(width, height, 4, buf.into_raw()),
        DynamicImage::ImageLuma16(buf) => keep(width, height, 1, buf.into_raw()),
        DynamicImage::ImageLumaA16(buf) => keep(width, height, 2, buf.into_raw()),
        DynamicImage::ImageRgb16(buf) => keep(width, height, 3, buf.into_raw()),
        DynamicImage::ImageRgba16(buf) => keep(width, height, 4, buf.into_raw()),
        other => Err(ConversionError::UnsupportedImageMode(format!("{:?}", other.color()))),
    }
}
