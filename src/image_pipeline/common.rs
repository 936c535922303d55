//! Common utilities module
//!
//! This module contains shared utilities used across the image pipeline:
//! the error type, file classification, status reporting and step timing.

pub mod error;
pub mod kind;
pub mod report;
pub mod timing;

pub use error::{ConversionError, Result};
pub use kind::FileKind;
pub use report::{ChannelReporter, Status, StatusReporter, TracingReporter};
pub use timing::{PipelineTimings, StepTiming, Timer};
