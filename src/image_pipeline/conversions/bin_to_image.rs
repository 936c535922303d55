use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::image_pipeline::{
    bridge::{ImageWriter, OutputConfig, StandardImageWriter, TargetFormat},
    common::{error::Result, FileKind, PipelineTimings},
    config::{self, BinSettings, DEFAULT_SETTINGS_PATH, RawConfig},
    conversions::io::{output_path, read_input, require_kind, write_output},
    raw::{ConfigurableDecoder, RawBinDecoder},
};

pub struct BinToImagePipeline<D: RawBinDecoder, W: ImageWriter> {
    decoder: D,
    writer: W,
    config: OutputConfig,
    settings_path: PathBuf,
}

impl BinToImagePipeline<ConfigurableDecoder, StandardImageWriter> {
    pub fn new(config: OutputConfig) -> Self {
        Self::with_custom(ConfigurableDecoder, StandardImageWriter, config)
    }
}

impl<D: RawBinDecoder, W: ImageWriter> BinToImagePipeline<D, W> {
    pub fn with_custom(decoder: D, writer: W, config: OutputConfig) -> Self {
        Self {
            decoder,
            writer,
            config,
            settings_path: PathBuf::from(DEFAULT_SETTINGS_PATH),
        }
    }

    /// Reads raw buffer settings from `path` instead of the default location.
    pub fn with_settings_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.settings_path = path.into();
        self
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Loads the raw buffer configuration as currently persisted.
    pub fn load_raw_config(&self) -> Result<RawConfig> {
        let settings = config::load(&self.settings_path, &BinSettings::default());
        RawConfig::try_from(&settings)
    }

    pub fn convert(
        &self,
        input_data: &[u8],
        raw_config: &RawConfig,
        format: TargetFormat,
        output: &mut dyn Write,
    ) -> Result<()> {
        self.convert_with_timings(input_data, raw_config, format, output)
            .map(|_| ())
    }

    #[instrument(skip(self, input_data, raw_config, output), fields(input_size = input_data.len()))]
    pub fn convert_with_timings(
        &self,
        input_data: &[u8],
        raw_config: &RawConfig,
        format: TargetFormat,
        output: &mut dyn Write,
    ) -> Result<PipelineTimings> {
        let mut timings = PipelineTimings::new();
        info!("Starting bin to {} conversion", format);

        let image = timings.measure("decode_raw", || {
            let _span = tracing::info_span!("decode_raw").entered();
            self.decoder.decode(input_data, raw_config)
        })?;

        timings.measure("validate_dimensions", || {
            let _span = tracing::info_span!(
                "validate_dimensions",
                width = image.width(),
                height = image.height()
            )
            .entered();
            self.config.check_dimensions(image.width(), image.height())
        })?;

        timings.measure("encode_image", || {
            let _span = tracing::info_span!("encode_image").entered();
            self.writer.write_image(&image, format, output, &self.config)
        })?;

        info!(
            width = image.width(),
            height = image.height(),
            "Conversion complete in {:.3}ms",
            timings.total_duration().as_secs_f64() * 1000.0
        );
        Ok(timings)
    }

    /// Converts one bin file into `<output_dir>/<stem>.<format>`.
    ///
    /// Settings are re-read on every call so edits between runs take effect.
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_dir: Q,
        format: TargetFormat,
    ) -> Result<PathBuf> {
        self.convert_file_with_timings(input_path, output_dir, format)
            .map(|(path, _)| path)
    }

    #[instrument(skip(self, input_path, output_dir))]
    pub fn convert_file_with_timings<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_dir: Q,
        format: TargetFormat,
    ) -> Result<(PathBuf, PipelineTimings)> {
        let input_path = input_path.as_ref();
        let output_path = output_path(input_path, output_dir.as_ref(), format.extension())?;

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Converting file"
        );

        require_kind(input_path, FileKind::Bin)?;
        let mut timings = PipelineTimings::new();

        let raw_config = timings.measure("load_settings", || self.load_raw_config())?;
        let input_data = timings.measure("read_input_file", || read_input(input_path))?;

        let mut encoded = Vec::new();
        let conversion = self.convert_with_timings(&input_data, &raw_config, format, &mut encoded)?;
        for step in conversion.steps() {
            timings.add_step(step.name.clone(), step.duration);
        }

        timings.measure("write_output_file", || write_output(&output_path, &encoded))?;
        Ok((output_path, timings))
    }

    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: OutputConfig) {
        self.config = config;
    }
}
