//! Image processing pipeline module
//!
//! This module converts between headerless raw pixel buffers and compressed
//! image files, with separate modules for configuration, raw decoding and
//! encoding, compressed format bridging, and conversion orchestration.

pub mod bridge;
pub mod common;
pub mod config;
pub mod conversions;
pub mod raw;

pub use common::{
    ChannelReporter,
    ConversionError,
    FileKind,
    PipelineTimings,
    Result,
    Status,
    StatusReporter,
    TracingReporter,
};

pub use config::{
    BinSettings,
    ChannelOrder,
    ElementType,
    Endianness,
    Layout,
    RawConfig,
    RawConfigBuilder,
};

pub use raw::{
    ColorMode,
    ConfigurableDecoder,
    PixelTensor,
    RawBinDecoder,
    RawEncoder,
};

pub use bridge::{
    ImageWriter,
    OutputConfig,
    OutputConfigBuilder,
    StandardImageWriter,
    TargetFormat,
    TiffCompression,
};

pub use conversions::{
    BatchRunner,
    BatchSummary,
    BinToImagePipeline,
    ImageConvertPipeline,
    ImageToBinPipeline,
};
