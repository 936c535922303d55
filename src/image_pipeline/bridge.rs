//! Format bridge module
//!
//! Moves pixels between the canonical tensor and compressed image files,
//! applying the same mode compatibility rule whether the source was a raw
//! buffer or another compressed image.

pub mod format;
pub mod palette;
pub mod reader;
pub mod standard_writer;
pub mod tiff_writer;
pub mod types;
mod writer;

pub use format::{ModeConversion, TargetFormat, mode_conversion};
pub use reader::{load_image, open_samples, samples_from_dynamic, tensor_from_dynamic, to_tensor};
pub use standard_writer::{StandardImageWriter, to_dynamic};
pub use types::{OutputConfig, OutputConfigBuilder, TiffCompression};
pub use writer::ImageWriter;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raw::types::PixelTensor;

/// Encodes `image` as `target` with default output options.
pub fn to_compressed(image: &PixelTensor, target: TargetFormat) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    StandardImageWriter.write_image(image, target, &mut buffer, &OutputConfig::default())?;
    Ok(buffer)
}

#[cfg(test)]
mod tests;
