//! Configurable decoder for headerless raw buffers.
//!
//! The buffer carries no metadata, so everything about it comes from a
//! [`RawConfig`]. Decoding runs a fixed sequence of steps, each feeding the
//! next: validate, interpret elements, reshape to the configured layout and
//! transpose to H×W×C, reduce to 8 bits, fix the channel order, flip, rotate,
//! and finally check the channel count maps to a colour mode.

use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::config::{Axis, ChannelOrder, Layout, RawConfig};
use crate::image_pipeline::raw::reader::RawBinDecoder;
use crate::image_pipeline::raw::types::PixelTensor;

/// Channel counts accepted when decoding.
///
/// Grayscale+alpha (2) is rejected here although the encoder accepts it.
const DECODABLE_CHANNELS: [usize; 3] = [1, 3, 4];

/// Standard [`RawBinDecoder`] driven entirely by the [`RawConfig`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigurableDecoder;

impl RawBinDecoder for ConfigurableDecoder {
    fn decode(&self, data: &[u8], config: &RawConfig) -> Result<PixelTensor> {
        debug!(
            "Decoding {} bytes as {}x{}x{} {} {}",
            data.len(),
            config.width,
            config.height,
            config.channels,
            config.element_type,
            config.layout
        );

        validate(config)?;
        let samples = interpret(data, config)?;
        let tensor = transpose_to_hwc(samples, config)?;
        let mut tensor = to_u8(tensor, config)?;

        if config.channels == 3 && config.channel_order == ChannelOrder::Bgr {
            tensor = tensor.reverse_channels();
        }
        if config.flip {
            tensor = tensor.flip_vertical();
        }
        tensor = tensor.rotate_ccw(quarter_turns(config.rotate)?);

        let mode = tensor.mode()?;
        debug!(
            "Decoded {:?} image {}x{}",
            mode,
            tensor.width(),
            tensor.height()
        );
        Ok(tensor)
    }
}

/// Decodes `data` with the standard decoder.
pub fn decode(data: &[u8], config: &RawConfig) -> Result<PixelTensor> {
    ConfigurableDecoder.decode(data, config)
}

fn validate(config: &RawConfig) -> Result<()> {
    if !DECODABLE_CHANNELS.contains(&config.channels) {
        return Err(ConversionError::InvalidChannelCount(config.channels));
    }
    if config.width == 0 || config.height == 0 {
        return Err(ConversionError::InvalidDimensions(config.width, config.height));
    }
    Ok(())
}

fn interpret(data: &[u8], config: &RawConfig) -> Result<Vec<f64>> {
    let expected = config
        .byte_len()
        .ok_or(ConversionError::InvalidDimensions(config.width, config.height))?;
    if data.len() != expected {
        return Err(ConversionError::SizeMismatch {
            expected,
            actual: data.len(),
        });
    }
    Ok(config.element_type.read_all(data, config.endianness))
}

fn transpose_to_hwc(samples: Vec<f64>, config: &RawConfig) -> Result<PixelTensor<f64>> {
    let (height, width, channels) = (config.height, config.width, config.channels);
    if config.layout == Layout::HWC {
        return PixelTensor::new(height, width, channels, samples);
    }

    let extent = |axis: Axis| match axis {
        Axis::Channel => channels,
        Axis::Height => height,
        Axis::Width => width,
    };
    let dims = config.layout.axes().map(extent);
    let strides = [dims[1] * dims[2], dims[2], 1];
    let stride = |axis: Axis| strides[config.layout.position(axis)];
    let (row_stride, col_stride, channel_stride) =
        (stride(Axis::Height), stride(Axis::Width), stride(Axis::Channel));

    let mut out = Vec::with_capacity(samples.len());
    for row in 0..height {
        for col in 0..width {
            let base = row * row_stride + col * col_stride;
            out.extend((0..channels).map(|c| samples[base + c * channel_stride]));
        }
    }
    PixelTensor::new(height, width, channels, out)
}

fn to_u8(tensor: PixelTensor<f64>, config: &RawConfig) -> Result<PixelTensor> {
    if config.normalize && config.element_type.is_float() {
        // NaN saturates to 0
        return Ok(tensor.map(|v| (v.clamp(0.0, 1.0) * 255.0) as u8));
    }

    if let Some(&value) = tensor
        .data()
        .iter()
        .find(|v| !(v.fract() == 0.0 && (0.0..=255.0).contains(*v)))
    {
        return Err(ConversionError::SampleOutOfRange {
            value,
            element_type: config.element_type,
        });
    }
    Ok(tensor.map(|v| v as u8))
}

fn quarter_turns(degrees: i64) -> Result<u32> {
    match degrees {
        0 => Ok(0),
        90 => Ok(1),
        180 => Ok(2),
        270 => Ok(3),
        other => Err(ConversionError::InvalidRotation(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::config::{ElementType, Endianness};

    fn gray_config(width: usize, height: usize) -> RawConfig {
        RawConfig::builder()
            .dimensions(width, height)
            .channels(1)
            .element_type(ElementType::U8)
            .layout(Layout::HWC)
            .endianness(Endianness::Little)
            .build()
    }

    #[test]
    fn test_decode_gray_2x2() {
        let tensor = decode(&[10, 20, 30, 40], &gray_config(2, 2)).unwrap();
        assert_eq!((tensor.height(), tensor.width(), tensor.channels()), (2, 2, 1));
        assert_eq!(tensor.get(0, 0, 0), 10);
        assert_eq!(tensor.get(0, 1, 0), 20);
        assert_eq!(tensor.get(1, 0, 0), 30);
        assert_eq!(tensor.get(1, 1, 0), 40);
    }

    #[test]
    fn test_size_mismatch() {
        let err = decode(&[10, 20, 30], &gray_config(2, 2)).unwrap_err();
        assert!(matches!(err, ConversionError::SizeMismatch { expected: 4, actual: 3 }));
    }

    #[test]
    fn test_empty_input_is_size_mismatch() {
        let err = decode(&[], &gray_config(2, 2)).unwrap_err();
        assert!(matches!(err, ConversionError::SizeMismatch { expected: 4, actual: 0 }));
    }

    #[test]
    fn test_size_mismatch_iff_length_differs() {
        let config = RawConfig::builder()
            .dimensions(3, 2)
            .channels(3)
            .element_type(ElementType::U16)
            .build();
        let expected = 3 * 2 * 3 * 2;
        for len in 0..expected + 4 {
            let result = decode(&vec![0u8; len], &config);
            assert_eq!(
                matches!(result, Err(ConversionError::SizeMismatch { .. })),
                len != expected,
                "len {len}"
            );
        }
    }

    #[test]
    fn test_chw_single_channel_matches_hwc() {
        let mut config = gray_config(2, 2);
        let hwc = decode(&[10, 20, 30, 40], &config).unwrap();
        config.layout = Layout::CHW;
        let chw = decode(&[10, 20, 30, 40], &config).unwrap();
        assert_eq!(hwc, chw);
    }

    #[test]
    fn test_every_layout_transposes_to_same_image() {
        let (height, width, channels) = (2usize, 3usize, 3usize);
        let value = |r: usize, c: usize, ch: usize| (r * 100 + c * 10 + ch) as u8;

        let mut reference = None;
        for name in ["HWC", "HCW", "WHC", "WCH", "CHW", "CWH"] {
            let layout = Layout::parse(name).unwrap();
            let extent = |axis: Axis| match axis {
                Axis::Height => height,
                Axis::Width => width,
                Axis::Channel => channels,
            };
            let dims = layout.axes().map(extent);

            let mut bytes = Vec::new();
            for i in 0..dims[0] {
                for j in 0..dims[1] {
                    for k in 0..dims[2] {
                        let mut coord = [0usize; 3];
                        for (axis, idx) in layout.axes().iter().zip([i, j, k]) {
                            let slot = match axis {
                                Axis::Height => 0,
                                Axis::Width => 1,
                                Axis::Channel => 2,
                            };
                            coord[slot] = idx;
                        }
                        bytes.push(value(coord[0], coord[1], coord[2]));
                    }
                }
            }

            let config = RawConfig::builder()
                .dimensions(width, height)
                .channels(channels)
                .layout(layout)
                .build();
            let tensor = decode(&bytes, &config).unwrap();
            assert_eq!(tensor.get(1, 2, 0), value(1, 2, 0), "{name}");
            assert_eq!(tensor.get(0, 1, 2), value(0, 1, 2), "{name}");

            match &reference {
                None => reference = Some(tensor),
                Some(expected) => assert_eq!(&tensor, expected, "{name}"),
            }
        }
    }

    #[test]
    fn test_rotate_90_ccw() {
        let config = RawConfig { rotate: 90, ..gray_config(2, 2) };
        let tensor = decode(&[1, 2, 3, 4], &config).unwrap();
        assert_eq!(tensor.data(), &[2, 4, 1, 3]);
    }

    #[test]
    fn test_invalid_rotation() {
        let config = RawConfig { rotate: 45, ..gray_config(2, 2) };
        let err = decode(&[1, 2, 3, 4], &config).unwrap_err();
        assert!(matches!(err, ConversionError::InvalidRotation(45)));

        let config = RawConfig { rotate: -90, ..gray_config(2, 2) };
        assert!(matches!(
            decode(&[1, 2, 3, 4], &config),
            Err(ConversionError::InvalidRotation(-90))
        ));
    }

    #[test]
    fn test_flip_then_rotate_order() {
        // flip gives [[3,4],[1,2]], rotating that ccw gives [[4,2],[3,1]]
        let config = RawConfig { flip: true, rotate: 90, ..gray_config(2, 2) };
        let tensor = decode(&[1, 2, 3, 4], &config).unwrap();
        assert_eq!(tensor.data(), &[4, 2, 3, 1]);
    }

    #[test]
    fn test_bgr_is_swapped_to_rgb() {
        let config = RawConfig::builder()
            .dimensions(2, 1)
            .channels(3)
            .channel_order(ChannelOrder::Bgr)
            .build();
        let tensor = decode(&[1, 2, 3, 4, 5, 6], &config).unwrap();
        assert_eq!(tensor.data(), &[3, 2, 1, 6, 5, 4]);
    }

    #[test]
    fn test_bgr_ignored_for_rgba() {
        let config = RawConfig::builder()
            .dimensions(1, 1)
            .channels(4)
            .channel_order(ChannelOrder::Bgr)
            .build();
        let tensor = decode(&[1, 2, 3, 4], &config).unwrap();
        assert_eq!(tensor.data(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_channel_validation() {
        for channels in [0usize, 2, 5] {
            let config = RawConfig { channels, ..gray_config(1, 1) };
            let err = decode(&vec![0u8; channels.max(1)], &config).unwrap_err();
            assert!(
                matches!(err, ConversionError::InvalidChannelCount(c) if c == channels),
                "{channels}"
            );
        }
    }

    #[test]
    fn test_zero_dimension() {
        let config = gray_config(0, 4);
        assert!(matches!(
            decode(&[], &config),
            Err(ConversionError::InvalidDimensions(0, 4))
        ));
    }

    #[test]
    fn test_normalize_float() {
        let values = [-0.5f32, 0.0, 0.5, 1.0, 2.0, f32::NAN];
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();
        let config = RawConfig::builder()
            .dimensions(3, 2)
            .channels(1)
            .element_type(ElementType::F32)
            .endianness(Endianness::Big)
            .normalize(true)
            .build();
        let tensor = decode(&bytes, &config).unwrap();
        assert_eq!(tensor.data(), &[0, 0, 127, 255, 255, 0]);
    }

    #[test]
    fn test_float_without_normalize_must_fit() {
        let config = RawConfig::builder()
            .dimensions(2, 1)
            .channels(1)
            .element_type(ElementType::F32)
            .build();
        let whole: Vec<u8> = [3.0f32, 250.0].iter().flat_map(|v| v.to_le_bytes()).collect();
        assert_eq!(decode(&whole, &config).unwrap().data(), &[3, 250]);

        let fractional: Vec<u8> = [0.5f32, 1.0].iter().flat_map(|v| v.to_le_bytes()).collect();
        assert!(matches!(
            decode(&fractional, &config),
            Err(ConversionError::SampleOutOfRange { element_type: ElementType::F32, .. })
        ));
    }

    #[test]
    fn test_uint16_carried_without_scaling() {
        let config = RawConfig::builder()
            .dimensions(2, 1)
            .channels(1)
            .element_type(ElementType::U16)
            .endianness(Endianness::Big)
            .normalize(true)
            .build();
        let tensor = decode(&[0x00, 0x07, 0x00, 0xff], &config).unwrap();
        assert_eq!(tensor.data(), &[7, 255]);

        let err = decode(&[0x01, 0x00, 0x00, 0x00], &config).unwrap_err();
        assert!(matches!(
            err,
            ConversionError::SampleOutOfRange { value, element_type: ElementType::U16 } if value == 256.0
        ));
    }
}
