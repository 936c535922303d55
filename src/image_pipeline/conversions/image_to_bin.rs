use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::image_pipeline::{
    bridge::open_samples,
    common::{error::Result, FileKind},
    config::ElementType,
    conversions::io::{output_path, read_input, require_kind, write_output},
    raw::RawEncoder,
};

/// Dumps compressed images as headerless buffers.
///
/// The element type is picked from the largest sample: `uint8` below 256,
/// `uint16` otherwise.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageToBinPipeline {
    encoder: RawEncoder,
}

impl ImageToBinPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_encoder(encoder: RawEncoder) -> Self {
        Self { encoder }
    }

    #[instrument(skip(self, input_data), fields(input_size = input_data.len()))]
    pub fn convert(&self, input_data: &[u8]) -> Result<(ElementType, Vec<u8>)> {
        let samples = {
            let _span = tracing::info_span!("decode_image").entered();
            open_samples(input_data)?
        };

        let (element_type, bytes) = {
            let _span = tracing::info_span!("encode_raw").entered();
            self.encoder.encode_auto(&samples)?
        };

        info!(
            width = samples.width(),
            height = samples.height(),
            channels = samples.channels(),
            "Encoded {} bytes as {}",
            bytes.len(),
            element_type
        );
        Ok((element_type, bytes))
    }

    /// Converts one image into `<output_dir>/<stem>.bin`.
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_dir: Q,
    ) -> Result<PathBuf> {
        let input_path = input_path.as_ref();
        let output_path = output_path(input_path, output_dir.as_ref(), "bin")?;

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Converting file"
        );

        require_kind(input_path, FileKind::Image)?;
        let input_data = read_input(input_path)?;
        let (_, bytes) = self.convert(&input_data)?;
        write_output(&output_path, &bytes)?;
        Ok(output_path)
    }
}
