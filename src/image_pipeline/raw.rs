//! Raw buffer module
//!
//! Decoding headerless pixel dumps into the canonical H×W×C tensor and
//! encoding tensors back into tightly packed buffers.

mod reader;
pub mod bin_decoder;
pub mod encoder;
pub mod types;

pub use reader::RawBinDecoder;
pub use bin_decoder::{ConfigurableDecoder, decode};
pub use encoder::{RawEncoder, encode, select_element_type};
pub use types::{ColorMode, PixelTensor, Sample};
