use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::image_pipeline::{
    bridge::{ImageWriter, OutputConfig, StandardImageWriter, TargetFormat, to_tensor},
    common::{error::Result, FileKind},
    conversions::io::{output_path, read_input, require_kind, write_output},
};

/// Re-encodes compressed images into another compressed format.
///
/// Dimension limits from the [`OutputConfig`] apply as in bin to image.
pub struct ImageConvertPipeline<W: ImageWriter> {
    writer: W,
    config: OutputConfig,
}

impl ImageConvertPipeline<StandardImageWriter> {
    pub fn new(config: OutputConfig) -> Self {
        Self::with_custom(StandardImageWriter, config)
    }
}

impl<W: ImageWriter> ImageConvertPipeline<W> {
    pub fn with_custom(writer: W, config: OutputConfig) -> Self {
        Self { writer, config }
    }

    #[instrument(skip(self, input_data, output), fields(input_size = input_data.len()))]
    pub fn convert(&self, input_data: &[u8], format: TargetFormat, output: &mut dyn Write) -> Result<()> {
        let image = {
            let _span = tracing::info_span!("decode_image").entered();
            to_tensor(input_data)?
        };

        {
            let _span = tracing::info_span!(
                "validate_dimensions",
                width = image.width(),
                height = image.height()
            )
            .entered();
            self.config.check_dimensions(image.width(), image.height())?;
        }

        {
            let _span = tracing::info_span!("encode_image").entered();
            self.writer.write_image(&image, format, output, &self.config)?;
        }

        info!(width = image.width(), height = image.height(), "Conversion complete");
        Ok(())
    }

    /// Converts one image into `<output_dir>/<stem>.<format>`.
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_dir: Q,
        format: TargetFormat,
    ) -> Result<PathBuf> {
        let input_path = input_path.as_ref();
        let output_path = output_path(input_path, output_dir.as_ref(), format.extension())?;

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Converting file"
        );

        require_kind(input_path, FileKind::Image)?;
        let input_data = read_input(input_path)?;
        let mut encoded = Vec::new();
        self.convert(&input_data, format, &mut encoded)?;
        write_output(&output_path, &encoded)?;
        Ok(output_path)
    }

    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: OutputConfig) {
        self.config = config;
    }
}
