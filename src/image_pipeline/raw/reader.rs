use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::config::RawConfig;
use crate::image_pipeline::raw::types::PixelTensor;

pub trait RawBinDecoder {
    fn decode(&self, data: &[u8], config: &RawConfig) -> Result<PixelTensor>;
}
