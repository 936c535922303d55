//! Extension-based input classification.
//!
//! Inputs are grouped by file extension only; magic bytes are never inspected.

use std::path::Path;

const BIN_EXTENSIONS: &[&str] = &["bin"];
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "bmp", "png", "gif", "tif", "tiff"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "flv", "wmv"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Headerless raw pixel dump
    Bin,
    /// Compressed image file
    Image,
    /// Video container
    Video,
    Other,
}

impl FileKind {
    pub fn classify<P: AsRef<Path>>(path: P) -> Self {
        let Some(ext) = path.as_ref().extension().and_then(|e| e.to_str()) else {
            return FileKind::Other;
        };
        let ext = ext.to_ascii_lowercase();

        if BIN_EXTENSIONS.contains(&ext.as_str()) {
            FileKind::Bin
        } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            FileKind::Image
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            FileKind::Video
        } else {
            FileKind::Other
        }
    }

    pub fn is_bin<P: AsRef<Path>>(path: P) -> bool {
        Self::classify(path) == FileKind::Bin
    }

    pub fn is_image<P: AsRef<Path>>(path: P) -> bool {
        Self::classify(path) == FileKind::Image
    }

    pub fn is_video<P: AsRef<Path>>(path: P) -> bool {
        Self::classify(path) == FileKind::Video
    }
}
