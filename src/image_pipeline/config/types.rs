//! Typed raw buffer configuration

use std::fmt;
use std::str::FromStr;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::config::element::{ElementType, Endianness};
use crate::image_pipeline::config::settings::BinSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Channel,
    Height,
    Width,
}

impl Axis {
    fn label(self) -> char {
        match self {
            Axis::Channel => 'C',
            Axis::Height => 'H',
            Axis::Width => 'W',
        }
    }
}

/// Order in which the axes of a raw buffer are laid out, outermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout([Axis; 3]);

impl Layout {
    pub const HWC: Layout = Layout([Axis::Height, Axis::Width, Axis::Channel]);
    pub const CHW: Layout = Layout([Axis::Channel, Axis::Height, Axis::Width]);

    /// Parses a case-insensitive permutation of `C`, `H` and `W`.
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = || ConversionError::InvalidLayout(value.to_string());
        let upper = value.trim().to_ascii_uppercase();
        if upper.chars().count() != 3 {
            return Err(invalid());
        }

        let mut axes = [Axis::Height; 3];
        for (slot, c) in axes.iter_mut().zip(upper.chars()) {
            *slot = match c {
                'C' => Axis::Channel,
                'H' => Axis::Height,
                'W' => Axis::Width,
                _ => return Err(invalid()),
            };
        }

        let distinct = axes[0] != axes[1] && axes[1] != axes[2] && axes[0] != axes[2];
        if !distinct {
            return Err(invalid());
        }
        Ok(Layout(axes))
    }

    pub fn axes(&self) -> [Axis; 3] {
        self.0
    }

    /// Position of `axis` in this layout.
    pub fn position(&self, axis: Axis) -> usize {
        self.0.iter().position(|&a| a == axis).unwrap_or(0)
    }
}

impl Default for Layout {
    fn default() -> Self {
        Layout::HWC
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|a| write!(f, "{}", a.label()))
    }
}

impl FromStr for Layout {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self> {
        Layout::parse(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrder {
    #[default]
    Rgb,
    Bgr,
    /// Single-plane data; behaves like `Rgb`
    Gray,
}

impl ChannelOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            ChannelOrder::Rgb => "RGB",
            ChannelOrder::Bgr => "BGR",
            ChannelOrder::Gray => "GRAY",
        }
    }
}

impl FromStr for ChannelOrder {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RGB" => Ok(ChannelOrder::Rgb),
            "BGR" => Ok(ChannelOrder::Bgr),
            "GRAY" => Ok(ChannelOrder::Gray),
            _ => Err(ConversionError::InvalidChannelOrder(s.to_string())),
        }
    }
}

/// Shape and encoding of one raw buffer.
///
/// `channels` and `rotate` are kept as given; their validity depends on the
/// operation and is checked by the decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct RawConfig {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub element_type: ElementType,
    pub endianness: Endianness,
    pub layout: Layout,
    pub normalize: bool,
    pub channel_order: ChannelOrder,
    /// Top-bottom mirror
    pub flip: bool,
    /// Counter-clockwise rotation in degrees
    pub rotate: i64,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            channels: 3,
            element_type: ElementType::U8,
            endianness: Endianness::Little,
            layout: Layout::HWC,
            normalize: false,
            channel_order: ChannelOrder::Rgb,
            flip: false,
            rotate: 0,
        }
    }
}

impl RawConfig {
    pub fn builder() -> RawConfigBuilder {
        RawConfigBuilder::default()
    }

    /// Number of elements the buffer must contain.
    pub fn element_count(&self) -> Option<usize> {
        self.width.checked_mul(self.height)?.checked_mul(self.channels)
    }

    /// Number of bytes the buffer must contain.
    pub fn byte_len(&self) -> Option<usize> {
        self.element_count()?.checked_mul(self.element_type.size())
    }
}

impl TryFrom<&BinSettings> for RawConfig {
    type Error = ConversionError;

    fn try_from(settings: &BinSettings) -> Result<Self> {
        Ok(Self {
            width: settings.width,
            height: settings.height,
            channels: settings.channels,
            element_type: settings.element_type.parse()?,
            endianness: settings.endianness.parse()?,
            layout: settings.layout.parse()?,
            normalize: settings.normalize,
            channel_order: settings.channel_order.parse()?,
            flip: settings.flip,
            rotate: settings.rotate,
        })
    }
}

impl From<&RawConfig> for BinSettings {
    fn from(config: &RawConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            channels: config.channels,
            element_type: config.element_type.name().to_string(),
            channel_order: config.channel_order.as_str().to_string(),
            layout: config.layout.to_string(),
            endianness: config.endianness.as_str().to_string(),
            normalize: config.normalize,
            flip: config.flip,
            rotate: config.rotate,
        }
    }
}

/// Builder for RawConfig
#[derive(Default)]
pub struct RawConfigBuilder {
    width: Option<usize>,
    height: Option<usize>,
    channels: Option<usize>,
    element_type: Option<ElementType>,
    endianness: Option<Endianness>,
    layout: Option<Layout>,
    normalize: Option<bool>,
    channel_order: Option<ChannelOrder>,
    flip: Option<bool>,
    rotate: Option<i64>,
}

impl RawConfigBuilder {
    pub fn dimensions(mut self, width: usize, height: usize) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn channels(mut self, channels: usize) -> Self {
        self.channels = Some(channels);
        self
    }

    pub fn element_type(mut self, element_type: ElementType) -> Self {
        self.element_type = Some(element_type);
        self
    }

    pub fn endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = Some(endianness);
        self
    }

    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = Some(normalize);
        self
    }

    pub fn channel_order(mut self, order: ChannelOrder) -> Self {
        self.channel_order = Some(order);
        self
    }

    pub fn flip(mut self, flip: bool) -> Self {
        self.flip = Some(flip);
        self
    }

    pub fn rotate(mut self, degrees: i64) -> Self {
        self.rotate = Some(degrees);
        self
    }

    pub fn build(self) -> RawConfig {
        let default = RawConfig::default();
        RawConfig {
            width: self.width.unwrap_or(default.width),
            height: self.height.unwrap_or(default.height),
            channels: self.channels.unwrap_or(default.channels),
            element_type: self.element_type.unwrap_or(default.element_type),
            endianness: self.endianness.unwrap_or(default.endianness),
            layout: self.layout.unwrap_or(default.layout),
            normalize: self.normalize.unwrap_or(default.normalize),
            channel_order: self.channel_order.unwrap_or(default.channel_order),
            flip: self.flip.unwrap_or(default.flip),
            rotate: self.rotate.unwrap_or(default.rotate),
        }
    }
}
