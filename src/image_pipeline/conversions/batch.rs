//! Best-effort processing of several input files.
//!
//! Files are converted strictly one after another. A failure is reported and
//! the batch moves on; nothing already written is rolled back.

use std::path::{Path, PathBuf};

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::common::report::{Status, StatusReporter};

#[derive(Debug, Default)]
pub struct BatchSummary {
    /// (input, output) of every converted file
    pub succeeded: Vec<(PathBuf, PathBuf)>,
    /// (input, error message) of every failed file
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct BatchRunner<'a> {
    reporter: &'a dyn StatusReporter,
}

impl<'a> BatchRunner<'a> {
    pub fn new(reporter: &'a dyn StatusReporter) -> Self {
        Self { reporter }
    }

    pub fn run<I, P, F>(&self, inputs: I, mut convert: F) -> BatchSummary
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
        F: FnMut(&Path) -> Result<PathBuf>,
    {
        let mut summary = BatchSummary::default();

        for input in inputs {
            let input = input.as_ref().to_path_buf();
            let _span = tracing::info_span!("batch_file", input = %input.display()).entered();
            self.reporter.report(Status::Started { input: input.clone() });

            match convert(&input) {
                Ok(output) => {
                    self.reporter.report(Status::Succeeded {
                        input: input.clone(),
                        output: output.clone(),
                    });
                    summary.succeeded.push((input, output));
                }
                Err(e) => {
                    let error = e.to_string();
                    self.reporter.report(Status::Failed {
                        input: input.clone(),
                        error: error.clone(),
                    });
                    summary.failed.push((input, error));
                }
            }
        }

        summary
    }
}
