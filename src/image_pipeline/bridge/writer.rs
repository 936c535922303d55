use std::io::Write;

use crate::image_pipeline::bridge::format::TargetFormat;
use crate::image_pipeline::bridge::types::OutputConfig;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raw::types::PixelTensor;

pub trait ImageWriter {
    fn write_image(
        &self,
        image: &PixelTensor,
        format: TargetFormat,
        output: &mut dyn Write,
        config: &OutputConfig,
    ) -> Result<()>;
}
