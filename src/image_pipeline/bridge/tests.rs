use image::{ColorType, DynamicImage, GenericImageView, ImageBuffer, Luma};

use super::*;
use crate::image_pipeline::common::error::ConversionError;
use crate::image_pipeline::config::{ElementType, Endianness};
use crate::image_pipeline::raw::{ColorMode, PixelTensor, RawEncoder};

fn tensor(width: usize, height: usize, channels: usize) -> PixelTensor {
    let data = (0..width * height * channels).map(|i| (i * 29 % 251) as u8).collect();
    PixelTensor::new(height, width, channels, data).unwrap()
}

#[test]
fn test_png_preserves_every_mode() {
    for channels in 1..=4 {
        let original = tensor(5, 3, channels);
        let png = to_compressed(&original, TargetFormat::Png).unwrap();
        let decoded = to_tensor(&png).unwrap();
        assert_eq!(decoded, original, "{channels} channels");
    }
}

#[test]
fn test_jpeg_from_rgba_is_opaque_rgb() {
    let jpeg = to_compressed(&tensor(8, 8, 4), TargetFormat::Jpeg).unwrap();
    let decoded = load_image(&jpeg).unwrap();
    assert_eq!(decoded.color(), ColorType::Rgb8);
    assert_eq!((decoded.width(), decoded.height()), (8, 8));
}

#[test]
fn test_jpeg_from_gray_alpha_is_rgb() {
    let jpeg = to_compressed(&tensor(4, 4, 2), TargetFormat::Jpeg).unwrap();
    assert_eq!(to_tensor(&jpeg).unwrap().mode().unwrap(), ColorMode::Rgb);
}

#[test]
fn test_jpeg_keeps_gray() {
    let jpeg = to_compressed(&tensor(4, 4, 1), TargetFormat::Jpeg).unwrap();
    assert_eq!(load_image(&jpeg).unwrap().color(), ColorType::L8);
}

#[test]
fn test_gray_gif_uses_exact_grey_palette() {
    let original = tensor(6, 2, 1);
    let gif = to_compressed(&original, TargetFormat::Gif).unwrap();
    let decoded = to_tensor(&gif).unwrap();

    assert_eq!((decoded.width(), decoded.height()), (6, 2));
    let px = decoded.pixel(1, 4);
    let expected = original.get(1, 4, 0);
    assert_eq!(&px[..3], &[expected, expected, expected]);
}

#[test]
fn test_colour_gif_is_quantized() {
    let original = tensor(10, 10, 3);
    let gif = to_compressed(&original, TargetFormat::Gif).unwrap();
    assert_eq!(&gif[..3], b"GIF");
    let decoded = to_tensor(&gif).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (10, 10));
}

#[test]
fn test_tiff_round_trip_with_compression() {
    let original = tensor(7, 5, 3);
    for compression in [
        TiffCompression::None,
        TiffCompression::Lzw,
        TiffCompression::DeflateFast,
        TiffCompression::DeflateBest,
    ] {
        let config = OutputConfig::builder().compression(compression).build();
        let mut buffer = Vec::new();
        StandardImageWriter
            .write_image(&original, TargetFormat::Tiff, &mut buffer, &config)
            .unwrap();
        assert_eq!(to_tensor(&buffer).unwrap(), original, "{compression:?}");
    }
}

#[test]
fn test_tiff_gray_alpha_widened_to_rgba() {
    let original = PixelTensor::new(1, 2, 2, vec![10u8, 100, 20, 200]).unwrap();
    let tiff = to_compressed(&original, TargetFormat::Tiff).unwrap();
    let decoded = to_tensor(&tiff).unwrap();
    assert_eq!(decoded.data(), &[10, 10, 10, 100, 20, 20, 20, 200]);
}

#[test]
fn test_bmp_dimensions() {
    let bmp = to_compressed(&tensor(3, 9, 3), TargetFormat::Bmp).unwrap();
    assert_eq!(&bmp[..2], b"BM");
    let decoded = to_tensor(&bmp).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (3, 9));
}

#[test]
fn test_unsupported_channel_count_rejected_by_writer() {
    let odd = PixelTensor::new(1, 1, 5, vec![0u8; 5]).unwrap();
    assert!(matches!(
        to_compressed(&odd, TargetFormat::Png),
        Err(ConversionError::UnsupportedChannelCount(5))
    ));
}

#[test]
fn test_garbage_is_decode_error() {
    assert!(matches!(
        to_tensor(b"definitely not an image"),
        Err(ConversionError::DecodeError(_))
    ));
}

#[test]
fn test_sixteen_bit_samples_survive_for_encoding() {
    let buffer: ImageBuffer<Luma<u16>, Vec<u16>> =
        ImageBuffer::from_raw(2, 1, vec![1000u16, 42]).unwrap();
    let mut png = std::io::Cursor::new(Vec::new());
    DynamicImage::ImageLuma16(buffer)
        .write_to(&mut png, image::ImageFormat::Png)
        .unwrap();
    let png = png.into_inner();

    let samples = open_samples(&png).unwrap();
    assert_eq!(samples.data(), &[1000, 42]);

    let (element_type, bytes) = RawEncoder::with_endianness(Endianness::Little)
        .encode_auto(&samples)
        .unwrap();
    assert_eq!(element_type, ElementType::U16);
    assert_eq!(bytes, vec![0xe8, 0x03, 42, 0]);

    let reduced = to_tensor(&png).unwrap();
    assert_eq!(reduced.channels(), 1);
}

#[test]
fn test_eight_bit_samples_widened() {
    let png = to_compressed(&tensor(2, 2, 3), TargetFormat::Png).unwrap();
    let samples = open_samples(&png).unwrap();
    assert_eq!(samples.max_sample().map(u32::from), to_tensor(&png).unwrap().max_sample().map(u32::from));
    let (element_type, _) = RawEncoder::new().encode_auto(&samples).unwrap();
    assert_eq!(element_type, ElementType::U8);
}

#[test]
fn test_float_samples_have_no_bin_layout() {
    let buffer: ImageBuffer<image::Rgb<f32>, Vec<f32>> = ImageBuffer::new(2, 1);
    let image = DynamicImage::ImageRgb32F(buffer);

    assert!(matches!(
        samples_from_dynamic(image.clone()),
        Err(ConversionError::UnsupportedImageMode(mode)) if mode == "Rgb32F"
    ));
    let reduced = tensor_from_dynamic(&image).unwrap();
    assert_eq!(reduced.mode().unwrap(), ColorMode::Rgb);
}
