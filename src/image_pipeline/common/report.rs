//! Progress and error notification.
//!
//! Conversions report through a [`StatusReporter`]. Reporting is a one-way
//! notification: implementations must not fail or panic, so a closed channel
//! or a missing listener simply drops the message.

use std::fmt;
use std::path::PathBuf;
use std::sync::mpsc::Sender;

use tracing::{error, info};

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Started { input: PathBuf },
    Succeeded { input: PathBuf, output: PathBuf },
    Failed { input: PathBuf, error: String },
}

impl Status {
    pub fn is_failure(&self) -> bool {
        matches!(self, Status::Failed { .. })
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Started { input } => write!(f, "Converting {}", input.display()),
            Status::Succeeded { input, output } => {
                write!(f, "Converted {} -> {}", input.display(), output.display())
            }
            Status::Failed { input, error } => write!(f, "Error: {}: {}", input.display(), error),
        }
    }
}

pub trait StatusReporter {
    fn report(&self, status: Status);
}

/// Reports every status as a log event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl StatusReporter for TracingReporter {
    fn report(&self, status: Status) {
        if status.is_failure() {
            error!("{}", status);
        } else {
            info!("{}", status);
        }
    }
}

/// Forwards statuses to a channel, e.g. to a UI thread.
#[derive(Debug, Clone)]
pub struct ChannelReporter {
    sender: Sender<Status>,
}

impl ChannelReporter {
    pub fn new(sender: Sender<Status>) -> Self {
        Self { sender }
    }
}

impl StatusReporter for ChannelReporter {
    fn report(&self, status: Status) {
        // receiver gone: nobody is listening anymore
        let _ = self.sender.send(status);
    }
}
