//! GIF output.
//!
//! GIF stores at most 256 palette entries. Grayscale images map directly onto
//! a 256-level grey palette; anything with colour or alpha is reduced with the
//! NeuQuant quantizer, fully transparent pixels becoming the transparent index.

use gif::{Encoder, Frame};
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raw::types::{ColorMode, PixelTensor};

fn grey_palette() -> Vec<u8> {
    (0..=255u8).flat_map(|v| [v, v, v]).collect()
}

pub fn encode_gif(image: &PixelTensor, speed: i32) -> Result<Vec<u8>> {
    let too_large = || ConversionError::InvalidDimensions(image.width(), image.height());
    let width = u16::try_from(image.width()).map_err(|_| too_large())?;
    let height = u16::try_from(image.height()).map_err(|_| too_large())?;

    let frame = match image.mode()? {
        ColorMode::Gray => {
            debug!("Writing grayscale GIF {}x{}", width, height);
            Frame::from_palette_pixels(width, height, image.data(), &grey_palette()[..], None)
        }
        mode => {
            debug!("Quantizing {:?} image {}x{} for GIF", mode, width, height);
            let mut rgba = image.to_rgba(u8::MAX)?.into_data();
            Frame::from_rgba_speed(width, height, &mut rgba, speed.clamp(1, 30))
        }
    };

    let mut buffer = Vec::new();
    {
        let mut encoder = Encoder::new(&mut buffer, width, height, &[])
            .map_err(|e| ConversionError::EncodeError(e.to_string()))?;
        encoder
            .write_frame(&frame)
            .map_err(|e| ConversionError::EncodeError(e.to_string()))?;
    }
    Ok(buffer)
}
