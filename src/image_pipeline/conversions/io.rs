//! File plumbing shared by the conversion pipelines

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::kind::FileKind;

pub(crate) fn require_kind(path: &Path, kind: FileKind) -> Result<()> {
    let actual = FileKind::classify(path);
    if actual == kind {
        return Ok(());
    }
    Err(ConversionError::UnsupportedFormat(format!(
        "{}: expected a {:?} file, found {:?}",
        path.display(),
        kind,
        actual
    )))
}

pub(crate) fn read_input(path: &Path) -> Result<Vec<u8>> {
    let _span = tracing::info_span!("read_input_file").entered();
    fs::read(path)
        .map_err(|e| ConversionError::InputReadError(format!("{}: {}", path.display(), e)))
}

/// `<output_dir>/<input stem>.<extension>`
pub(crate) fn output_path(input: &Path, output_dir: &Path, extension: &str) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .ok_or_else(|| ConversionError::InputReadError(format!("{}: no file name", input.display())))?;
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(extension);
    Ok(output_dir.join(name))
}

/// Writes `data` to `path`, creating missing parent directories.
pub(crate) fn write_output(path: &Path, data: &[u8]) -> Result<()> {
    let _span = tracing::info_span!("write_output_file", bytes = data.len()).entered();
    let write_error = |e: std::io::Error| {
        ConversionError::OutputWriteError(format!("{}: {}", path.display(), e))
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(path, data).map_err(write_error)?;
    debug!("Wrote {}", path.display());
    Ok(())
}
