//! Raw buffer encoder.
//!
//! The inverse of the decoder's shaping step only: samples are written
//! row-major, channel fastest, with no header and no normalisation, flip,
//! rotation or channel reordering.

use tracing::debug;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::config::{ElementType, Endianness};
use crate::image_pipeline::raw::types::{PixelTensor, Sample};

/// Element type wide enough for a largest sample of `max`.
pub fn select_element_type(max: u32) -> ElementType {
    if max < 256 { ElementType::U8 } else { ElementType::U16 }
}

#[derive(Debug, Clone, Copy)]
pub struct RawEncoder {
    endianness: Endianness,
}

impl Default for RawEncoder {
    fn default() -> Self {
        Self {
            endianness: Endianness::native(),
        }
    }
}

impl RawEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endianness(endianness: Endianness) -> Self {
        Self { endianness }
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    pub fn encode<T: Sample>(&self, tensor: &PixelTensor<T>, element_type: ElementType) -> Result<Vec<u8>> {
        let mode = tensor.mode()?;
        debug!(
            "Encoding {:?} {}x{} as {} ({})",
            mode,
            tensor.width(),
            tensor.height(),
            element_type,
            self.endianness.as_str()
        );

        let mut out = Vec::with_capacity(tensor.data().len() * element_type.size());
        for &sample in tensor.data() {
            element_type.write(sample.to_f64(), self.endianness, &mut out)?;
        }
        Ok(out)
    }

    /// Encodes with the narrowest element type that holds every sample.
    pub fn encode_auto<T: Sample>(&self, tensor: &PixelTensor<T>) -> Result<(ElementType, Vec<u8>)> {
        let max = tensor.max_sample().map_or(0.0, Sample::to_f64) as u32;
        let element_type = select_element_type(max);
        Ok((element_type, self.encode(tensor, element_type)?))
    }
}

/// Encodes `tensor` in native byte order.
pub fn encode<T: Sample>(tensor: &PixelTensor<T>, element_type: ElementType) -> Result<Vec<u8>> {
    RawEncoder::new().encode(tensor, element_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::common::error::ConversionError;
    use crate::image_pipeline::config::RawConfig;
    use crate::image_pipeline::raw::bin_decoder::decode;

    #[test]
    fn test_select_element_type() {
        assert_eq!(select_element_type(0), ElementType::U8);
        assert_eq!(select_element_type(255), ElementType::U8);
        assert_eq!(select_element_type(256), ElementType::U16);
        assert_eq!(select_element_type(65535), ElementType::U16);
    }

    #[test]
    fn test_decode_encode_round_trip() {
        let native = Endianness::native();
        for element_type in ElementType::ALL {
            for (width, height, channels) in [(2, 2, 1), (3, 2, 3), (1, 5, 4), (7, 3, 3)] {
                let config = RawConfig::builder()
                    .dimensions(width, height)
                    .channels(channels)
                    .element_type(element_type)
                    .endianness(native)
                    .build();
                let mut bytes = Vec::new();
                for i in 0..width * height * channels {
                    let value = (i * 37 % 128) as f64;
                    element_type.write(value, native, &mut bytes).unwrap();
                }

                let tensor = decode(&bytes, &config).unwrap();
                assert_eq!(
                    encode(&tensor, element_type).unwrap(),
                    bytes,
                    "{element_type} {width}x{height}x{channels}"
                );
            }
        }
    }

    #[test]
    fn test_u16_byte_order() {
        let tensor = PixelTensor::new(1, 2, 1, vec![1u16, 0x0302]).unwrap();
        let little = RawEncoder::with_endianness(Endianness::Little)
            .encode(&tensor, ElementType::U16)
            .unwrap();
        assert_eq!(little, vec![1, 0, 2, 3]);
        let big = RawEncoder::with_endianness(Endianness::Big)
            .encode(&tensor, ElementType::U16)
            .unwrap();
        assert_eq!(big, vec![0, 1, 3, 2]);
    }

    #[test]
    fn test_encode_auto_widens() {
        let encoder = RawEncoder::with_endianness(Endianness::Little);
        let narrow = PixelTensor::new(1, 1, 3, vec![1u16, 2, 255]).unwrap();
        let (ty, bytes) = encoder.encode_auto(&narrow).unwrap();
        assert_eq!(ty, ElementType::U8);
        assert_eq!(bytes, vec![1, 2, 255]);

        let wide = PixelTensor::new(1, 1, 3, vec![1u16, 2, 4096]).unwrap();
        let (ty, bytes) = encoder.encode_auto(&wide).unwrap();
        assert_eq!(ty, ElementType::U16);
        assert_eq!(bytes, vec![1, 0, 2, 0, 0, 16]);
    }

    #[test]
    fn test_gray_alpha_encodes_but_does_not_decode() {
        let tensor = PixelTensor::new(1, 2, 2, vec![10u8, 255, 20, 128]).unwrap();
        let bytes = encode(&tensor, ElementType::U8).unwrap();
        assert_eq!(bytes, vec![10, 255, 20, 128]);

        let config = RawConfig::builder().dimensions(2, 1).channels(2).build();
        assert!(matches!(
            decode(&bytes, &config),
            Err(ConversionError::InvalidChannelCount(2))
        ));
    }

    #[test]
    fn test_sample_too_wide_for_element_type() {
        let tensor = PixelTensor::new(1, 1, 1, vec![300u16]).unwrap();
        assert!(matches!(
            encode(&tensor, ElementType::U8),
            Err(ConversionError::SampleOutOfRange { element_type: ElementType::U8, .. })
        ));
    }

    #[test]
    fn test_unmappable_channel_count() {
        let tensor = PixelTensor::new(1, 1, 6, vec![0u8; 6]).unwrap();
        assert!(matches!(
            encode(&tensor, ElementType::U8),
            Err(ConversionError::UnsupportedChannelCount(6))
        ));
    }
}
