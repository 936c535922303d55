//! Pipeline conversions module
//!
//! This module contains orchestration logic for the file-level conversions:
//! bin to image, image to bin, image to image, and batches of those.

mod io;
pub mod batch;
mod bin_to_image;
mod image_convert;
mod image_to_bin;


pub use batch::{BatchRunner, BatchSummary};
pub use bin_to_image::BinToImagePipeline;
pub use image_convert::ImageConvertPipeline;
pub use image_to_bin::ImageToBinPipeline;
