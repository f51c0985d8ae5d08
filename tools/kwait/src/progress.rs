//! Progress lines for the terminal

use poller::{ProgressEvent, ProgressSink};
use tracing::info;

/// Logs one "Waiting for <Kind> <name>: ..." line per event
#[derive(Debug, Clone)]
pub struct LogProgressSink {
    label: String,
}

impl LogProgressSink {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }

    /// Line logged for `event`
    pub fn line(&self, event: &ProgressEvent) -> String {
        format!("Waiting for {}: {}", self.label, event)
    }
}

impl ProgressSink for LogProgressSink {
    fn report(&self, event: &ProgressEvent) {
        info!("{}", self.line(event));
    }
}
