//! Canonical pixel tensor types

use crate::image_pipeline::common::error::{ConversionError, Result};

/// Colour interpretation of a tensor's channel axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Gray,
    GrayAlpha,
    Rgb,
    Rgba,
}

impl ColorMode {
    pub fn from_channels(channels: usize) -> Result<Self> {
        match channels {
            1 => Ok(ColorMode::Gray),
            2 => Ok(ColorMode::GrayAlpha),
            3 => Ok(ColorMode::Rgb),
            4 => Ok(ColorMode::Rgba),
            other => Err(ConversionError::UnsupportedChannelCount(other)),
        }
    }

    pub fn channels(self) -> usize {
        match self {
            ColorMode::Gray => 1,
            ColorMode::GrayAlpha => 2,
            ColorMode::Rgb => 3,
            ColorMode::Rgba => 4,
        }
    }

    pub fn has_alpha(self) -> bool {
        matches!(self, ColorMode::GrayAlpha | ColorMode::Rgba)
    }
}

/// Integer sample that can be serialized into a raw buffer.
pub trait Sample: Copy + Ord + Default {
    fn to_f64(self) -> f64;
}

impl Sample for u8 {
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Sample for u16 {
    fn to_f64(self) -> f64 {
        self as f64
    }
}

/// Image samples indexed (row, column, channel), channel fastest.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelTensor<T = u8> {
    height: usize,
    width: usize,
    channels: usize,
    data: Vec<T>,
}

impl<T: Copy> PixelTensor<T> {
    /// Wraps `data` laid out as height × width × channels.
    pub fn new(height: usize, width: usize, channels: usize, data: Vec<T>) -> Result<Self> {
        let expected = height
            .checked_mul(width)
            .and_then(|n| n.checked_mul(channels))
            .ok_or(ConversionError::InvalidDimensions(width, height))?;
        if data.len() != expected {
            return Err(ConversionError::InvalidDimensions(width, height));
        }
        Ok(Self { height, width, channels, data })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    pub fn mode(&self) -> Result<ColorMode> {
        ColorMode::from_channels(self.channels)
    }

    fn index(&self, row: usize, col: usize) -> usize {
        (row * self.width + col) * self.channels
    }

    pub fn pixel(&self, row: usize, col: usize) -> &[T] {
        let start = self.index(row, col);
        &self.data[start..start + self.channels]
    }

    pub fn get(&self, row: usize, col: usize, channel: usize) -> T {
        self.data[self.index(row, col) + channel]
    }

    pub fn map<U>(&self, f: impl FnMut(T) -> U) -> PixelTensor<U> {
        PixelTensor {
            height: self.height,
            width: self.width,
            channels: self.channels,
            data: self.data.iter().copied().map(f).collect(),
        }
    }

    /// Reverses the channel axis (RGB ↔ BGR).
    pub fn reverse_channels(mut self) -> Self {
        if self.channels > 1 {
            self.data.chunks_exact_mut(self.channels).for_each(|px| px.reverse());
        }
        self
    }

    /// Reverses the row axis (top-bottom mirror).
    pub fn flip_vertical(self) -> Self {
        let row_len = self.width * self.channels;
        if row_len == 0 {
            return self;
        }
        let data = self.data.chunks_exact(row_len).rev().flatten().copied().collect();
        Self { data, ..self }
    }

    /// Rotates the row/column plane counter-clockwise by `quarter_turns` × 90°.
    pub fn rotate_ccw(self, quarter_turns: u32) -> Self {
        match quarter_turns % 4 {
            0 => self,
            1 => self.rotate_ccw_once(),
            2 => self.rotate_half(),
            _ => self.rotate_half().rotate_ccw_once(),
        }
    }

    fn rotate_ccw_once(self) -> Self {
        let (height, width) = (self.width, self.height);
        let mut data = Vec::with_capacity(self.data.len());
        for row in 0..height {
            for col in 0..width {
                data.extend_from_slice(self.pixel(col, self.width - 1 - row));
            }
        }
        Self { height, width, channels: self.channels, data }
    }

    fn rotate_half(self) -> Self {
        let channels = self.channels;
        if channels == 0 {
            return self;
        }
        let data = self.data.chunks_exact(channels).rev().flatten().copied().collect();
        Self { data, ..self }
    }

    /// Keeps only the first `channels` channels of every pixel.
    pub fn truncate_channels(&self, channels: usize) -> Self {
        let keep = channels.min(self.channels);
        let data = self
            .data
            .chunks_exact(self.channels.max(1))
            .flat_map(|px| px[..keep].iter().copied())
            .collect();
        Self { height: self.height, width: self.width, channels: keep, data }
    }

    /// Opaque RGB view: alpha is dropped and gray is replicated.
    pub fn to_rgb(&self) -> Result<Self> {
        match self.mode()? {
            ColorMode::Rgb => Ok(self.clone()),
            ColorMode::Rgba => Ok(self.truncate_channels(3)),
            ColorMode::Gray | ColorMode::GrayAlpha => {
                let data = self
                    .data
                    .chunks_exact(self.channels)
                    .flat_map(|px| [px[0]; 3])
                    .collect();
                Ok(Self { height: self.height, width: self.width, channels: 3, data })
            }
        }
    }

    /// RGBA view: gray is replicated and missing alpha is filled with `opaque`.
    pub fn to_rgba(&self, opaque: T) -> Result<Self> {
        let data = match self.mode()? {
            ColorMode::Rgba => return Ok(self.clone()),
            ColorMode::Rgb => self
                .data
                .chunks_exact(3)
                .flat_map(|px| [px[0], px[1], px[2], opaque])
                .collect(),
            ColorMode::GrayAlpha => self
                .data
                .chunks_exact(2)
                .flat_map(|px| [px[0], px[0], px[0], px[1]])
                .collect(),
            ColorMode::Gray => self.data.iter().flat_map(|&v| [v, v, v, opaque]).collect(),
        };
        Ok(Self { height: self.height, width: self.width, channels: 4, data })
    }
}

impl<T: Sample> PixelTensor<T> {
    /// Largest sample over all channels, `None` for an empty tensor.
    pub fn max_sample(&self) -> Option<T> {
        self.data.iter().copied().max()
    }
}
