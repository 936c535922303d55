//! Raw buffer configuration module
//!
//! Typed description of a headerless buffer and the persisted settings
//! document it is loaded from.

pub mod element;
pub mod settings;
pub mod types;

pub use element::{ElementSpec, ElementType, Endianness};
pub use settings::{
    BinSettings, DEFAULT_SETTINGS_PATH, PartialBinSettings, load, merge_defaults, save,
};
pub use types::{Axis, ChannelOrder, Layout, RawConfig, RawConfigBuilder};
