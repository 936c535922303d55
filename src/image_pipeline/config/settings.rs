//! Persisted raw buffer settings.
//!
//! The settings document is a flat TOML table. It may be edited between runs,
//! so it is re-read for every conversion. A missing or corrupt document is not
//! an error: every absent value falls back to its default.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::image_pipeline::common::error::{ConversionError, Result};

pub const DEFAULT_SETTINGS_PATH: &str = "settings/bin_setting.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinSettings {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    #[serde(alias = "dtype")]
    pub element_type: String,
    pub channel_order: String,
    pub layout: String,
    pub endianness: String,
    pub normalize: bool,
    pub flip: bool,
    pub rotate: i64,
}

impl Default for BinSettings {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            channels: 3,
            element_type: "uint8".to_string(),
            channel_order: "RGB".to_string(),
            layout: "HWC".to_string(),
            endianness: "little".to_string(),
            normalize: false,
            flip: false,
            rotate: 0,
        }
    }
}

/// A settings document as found on disk, possibly missing keys.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PartialBinSettings {
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub channels: Option<usize>,
    #[serde(alias = "dtype")]
    pub element_type: Option<String>,
    pub channel_order: Option<String>,
    pub layout: Option<String>,
    pub endianness: Option<String>,
    pub normalize: Option<bool>,
    pub flip: Option<bool>,
    pub rotate: Option<i64>,
}

/// Fills every key missing from `partial` with the value from `defaults`.
pub fn merge_defaults(partial: PartialBinSettings, defaults: &BinSettings) -> BinSettings {
    BinSettings {
        width: partial.width.unwrap_or(defaults.width),
        height: partial.height.unwrap_or(defaults.height),
        channels: partial.channels.unwrap_or(defaults.channels),
        element_type: partial.element_type.unwrap_or_else(|| defaults.element_type.clone()),
        channel_order: partial.channel_order.unwrap_or_else(|| defaults.channel_order.clone()),
        layout: partial.layout.unwrap_or_else(|| defaults.layout.clone()),
        endianness: partial.endianness.unwrap_or_else(|| defaults.endianness.clone()),
        normalize: partial.normalize.unwrap_or(defaults.normalize),
        flip: partial.flip.unwrap_or(defaults.flip),
        rotate: partial.rotate.unwrap_or(defaults.rotate),
    }
}

/// Loads the settings at `path`, degrading to `defaults` on any read or parse failure.
pub fn load<P: AsRef<Path>>(path: P, defaults: &BinSettings) -> BinSettings {
    let path = path.as_ref();

    let partial = match fs::read_to_string(path) {
        Ok(text) => match toml::from_str::<PartialBinSettings>(&text) {
            Ok(partial) => partial,
            Err(e) => {
                warn!("Ignoring unparsable settings {}: {}", path.display(), e);
                PartialBinSettings::default()
            }
        },
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No settings at {}, using defaults", path.display());
            PartialBinSettings::default()
        }
        Err(e) => {
            warn!("Ignoring unreadable settings {}: {}", path.display(), e);
            PartialBinSettings::default()
        }
    };

    merge_defaults(partial, defaults)
}

/// Writes `settings` to `path`, replacing any previous document.
pub fn save<P: AsRef<Path>>(path: P, settings: &BinSettings) -> Result<()> {
    let path = path.as_ref();
    let text = toml::to_string_pretty(settings)
        .map_err(|e| ConversionError::ConfigError(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            ConversionError::OutputWriteError(format!("{}: {}", parent.display(), e))
        })?;
    }
    fs::write(path, text)
        .map_err(|e| ConversionError::OutputWriteError(format!("{}: {}", path.display(), e)))?;

    debug!("Saved settings to {}", path.display());
    Ok(())
}
