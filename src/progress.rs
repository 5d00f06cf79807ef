//! Progress reporting for chunked transfers.

use std::path::Path;

use tracing::info;

use crate::export::TransferMode;

/// Fraction of a transfer completed, as reported after each chunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferProgress {
    pub received: u64,
    pub total: Option<u64>,
}

impl TransferProgress {
    /// Completed fraction in `[0, 1]`. An unknown total counts as done once
    /// the transfer reports completion, and as zero before that.
    pub fn fraction(&self, done: bool) -> f64 {
        match self.total {
            Some(0) => 1.0,
            Some(total) => (self.received as f64 / total as f64).min(1.0),
            None if done => 1.0,
            None => 0.0,
        }
    }

    /// `floor(fraction * 100)`.
    pub fn percent(&self, done: bool) -> u32 {
        (self.fraction(done) * 100.0).floor() as u32
    }
}

/// Receives download lifecycle events.
pub trait ProgressReporter: Send + Sync {
    fn on_chunk(&self, _mode: TransferMode, _progress: TransferProgress, _done: bool) {}
    fn on_complete(&self, _destination: &Path, _bytes: u64) {}
}

/// Reporter that writes progress through `tracing`.
#[derive(Debug, Default)]
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn on_chunk(&self, mode: TransferMode, progress: TransferProgress, done: bool) {
        info!("{} {}%.", mode.progress_label(), progress.percent(done));
    }

    fn on_complete(&self, destination: &Path, _bytes: u64) {
        info!("File downloaded successfully to {}.", destination.display());
    }
}
