use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{error, info};

use rawbin_convert::image_pipeline::config::{self, BinSettings};
use rawbin_convert::image_pipeline::{
    BatchRunner, BatchSummary, BinToImagePipeline, ImageConvertPipeline, ImageToBinPipeline,
    OutputConfig, RawConfig, TargetFormat, TiffCompression, TracingReporter,
};
use rawbin_convert::logger;

#[derive(Parser)]
#[command(name = "rawbin_convert", version, about = "Convert between raw pixel dumps and image files")]
struct Cli {
    /// Raw buffer settings document
    #[arg(long, global = true, default_value = config::DEFAULT_SETTINGS_PATH)]
    settings: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode bin files into images using the saved settings
    Bin2img {
        #[command(flatten)]
        io: IoArgs,
        #[command(flatten)]
        output: OutputArgs,
        /// Print per-step timings for every file
        #[arg(long)]
        timings: bool,
    },
    /// Dump images as headerless bin files
    Img2bin {
        #[command(flatten)]
        io: IoArgs,
    },
    /// Re-encode images into another format
    Convert {
        #[command(flatten)]
        io: IoArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Show or edit the saved raw buffer settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Args)]
struct IoArgs {
    /// Input files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Directory receiving the converted files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
}

#[derive(Args)]
struct OutputArgs {
    /// Target image format (jpeg, png, bmp, tiff, gif)
    #[arg(short, long, default_value = "png", value_parser = parse_format)]
    format: TargetFormat,
    /// TIFF compression
    #[arg(long, value_enum, default_value_t = Compression::None)]
    compression: Compression,
    /// Use the horizontal TIFF predictor
    #[arg(long)]
    predictor: bool,
    /// JPEG quality (1-100)
    #[arg(long, default_value_t = 75)]
    quality: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Compression {
    None,
    Lzw,
    DeflateFast,
    DeflateBalanced,
    DeflateBest,
}

impl Compression {
    fn to_tiff_compression(self) -> TiffCompression {
        match self {
            Compression::None => TiffCompression::None,
            Compression::Lzw => TiffCompression::Lzw,
            Compression::DeflateFast => TiffCompression::DeflateFast,
            Compression::DeflateBalanced => TiffCompression::DeflateBalanced,
            Compression::DeflateBest => TiffCompression::DeflateBest,
        }
    }
}

impl OutputArgs {
    fn to_config(&self) -> OutputConfig {
        OutputConfig::builder()
            .compression(self.compression.to_tiff_compression())
            .predictor(self.predictor.then_some(2))
            .jpeg_quality(self.quality)
            .build()
    }
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the effective settings
    Show,
    /// Restore the default settings
    Reset,
    /// Change individual settings
    Set(SetArgs),
}

#[derive(Args)]
struct SetArgs {
    #[arg(long)]
    width: Option<usize>,
    #[arg(long)]
    height: Option<usize>,
    #[arg(long)]
    channels: Option<usize>,
    /// uint8, int8, uint16, int16, uint32, int32, float32 or float64
    #[arg(long)]
    element_type: Option<String>,
    /// RGB, BGR or GRAY
    #[arg(long)]
    channel_order: Option<String>,
    /// Permutation of C, H and W
    #[arg(long)]
    layout: Option<String>,
    /// little or big
    #[arg(long)]
    endianness: Option<String>,
    #[arg(long)]
    normalize: Option<bool>,
    #[arg(long)]
    flip: Option<bool>,
    /// 0, 90, 180 or 270 degrees counter-clockwise
    #[arg(long, allow_negative_numbers = true)]
    rotate: Option<i64>,
}

impl SetArgs {
    fn apply(self, settings: &mut BinSettings) {
        if let Some(v) = self.width {
            settings.width = v;
        }
        if let Some(v) = self.height {
            settings.height = v;
        }
        if let Some(v) = self.channels {
            settings.channels = v;
        }
        if let Some(v) = self.element_type {
            settings.element_type = v;
        }
        if let Some(v) = self.channel_order {
            settings.channel_order = v;
        }
        if let Some(v) = self.layout {
            settings.layout = v;
        }
        if let Some(v) = self.endianness {
            settings.endianness = v;
        }
        if let Some(v) = self.normalize {
            settings.normalize = v;
        }
        if let Some(v) = self.flip {
            settings.flip = v;
        }
        if let Some(v) = self.rotate {
            settings.rotate = v;
        }
    }
}

fn parse_format(s: &str) -> std::result::Result<TargetFormat, String> {
    s.parse().map_err(|e: rawbin_convert::image_pipeline::ConversionError| e.to_string())
}

fn finish(summary: &BatchSummary) -> ExitCode {
    info!(
        "Converted {} of {} files",
        summary.succeeded.len(),
        summary.total()
    );
    if summary.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run_settings(path: &Path, action: SettingsAction) -> Result<ExitCode> {
    match action {
        SettingsAction::Show => {
            let settings = config::load(path, &BinSettings::default());
            let text = toml::to_string_pretty(&settings).context("Failed to render settings")?;
            println!("# {}\n{}", path.display(), text);
        }
        SettingsAction::Reset => {
            config::save(path, &BinSettings::default())?;
            info!("Restored default settings in {}", path.display());
        }
        SettingsAction::Set(args) => {
            let mut settings = config::load(path, &BinSettings::default());
            args.apply(&mut settings);
            RawConfig::try_from(&settings).context("Refusing to save invalid settings")?;
            config::save(path, &settings)?;
            info!("Saved settings to {}", path.display());
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn run(cli: Cli) -> Result<ExitCode> {
    let reporter = TracingReporter;
    let runner = BatchRunner::new(&reporter);

    match cli.command {
        Command::Bin2img { io, output, timings } => {
            let format = output.format;
            let pipeline = BinToImagePipeline::new(output.to_config()).with_settings_path(&cli.settings);
            info!("Settings: {}", pipeline.settings_path().display());

            let summary = runner.run(&io.inputs, |input| {
                if timings {
                    let (path, timings) =
                        pipeline.convert_file_with_timings(input, &io.output_dir, format)?;
                    info!("Timings for {}:\n{}", input.display(), timings);
                    Ok(path)
                } else {
                    pipeline.convert_file(input, &io.output_dir, format)
                }
            });
            Ok(finish(&summary))
        }
        Command::Img2bin { io } => {
            let pipeline = ImageToBinPipeline::new();
            let summary = runner.run(&io.inputs, |input| pipeline.convert_file(input, &io.output_dir));
            Ok(finish(&summary))
        }
        Command::Convert { io, output } => {
            let format = output.format;
            let pipeline = ImageConvertPipeline::new(output.to_config());
            let summary = runner.run(&io.inputs, |input| {
                pipeline.convert_file(input, &io.output_dir, format)
            });
            Ok(finish(&summary))
        }
        Command::Settings { action } => run_settings(&cli.settings, action),
    }
}

fn main() -> ExitCode {
    logger::init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
