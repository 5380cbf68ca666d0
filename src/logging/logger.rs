//! Structured logger with batch summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::STAGE_TARGET;
use super::types::{BatchCounts, BatchEntry, Log};
use super::utils::log_file_path;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger with batch summary collection.
///
/// Console and file output both go through `tracing`; the persistent copy
/// lives at `$XDG_CACHE_HOME/airc/<command>.log` (default
/// `~/.cache/airc/<command>.log`).
#[derive(Debug)]
pub struct Logger {
    batches: Mutex<Vec<BatchEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger for `command`.
    ///
    /// Only remembers the log file path for the summary; the file itself is
    /// created by [`init_subscriber`](super::subscriber::init_subscriber).
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self::with_log_file(log_file_path(command))
    }

    /// Create a logger that reports `log_file` in its summary.
    #[must_use]
    pub const fn with_log_file(log_file: Option<PathBuf>) -> Self {
        Self {
            batches: Mutex::new(Vec::new()),
            log_file,
        }
    }

    /// Return the log file path, if available.
    #[cfg(test)]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Return a clone of all recorded batches.
    #[must_use]
    pub fn batch_entries(&self) -> Vec<BatchEntry> {
        self.batches.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Record a batch result for the summary.
    pub fn record_batch(&self, name: &str, counts: BatchCounts) {
        if let Ok(mut guard) = self.batches.lock() {
            guard.push(BatchEntry {
                name: name.to_string(),
                counts,
            });
        }
    }

    /// Total number of per-file failures across all recorded batches.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.batches
            .lock()
            .map_or(0, |guard| guard.iter().map(|b| b.counts.failed).sum())
    }

    /// Print one line per recorded batch, then the log file location.
    pub fn print_summary(&self) {
        let batches = self.batch_entries();
        if batches.is_empty() {
            return;
        }

        self.stage("Summary");
        for batch in &batches {
            self.info(&summary_line(batch));
        }
        let failed = self.failure_count();
        if failed > 0 {
            let total: usize = batches.iter().map(|b| b.counts.total()).sum();
            self.warn(&format!(
                "{failed} of {total} file(s) failed; the working tree may be incomplete"
            ));
        }
        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

/// `✓ save → default (3 ok, 0 skipped, 0 failed)`, coloured by the worst
/// outcome in the batch.
fn summary_line(batch: &BatchEntry) -> String {
    let BatchCounts {
        synced,
        skipped,
        failed,
    } = batch.counts;
    let (icon, color) = match (synced, skipped, failed) {
        (_, _, 1..) => ("✗", "\x1b[31m"),
        (_, 1.., 0) => ("○", "\x1b[33m"),
        (0, 0, 0) => ("·", "\x1b[2m"),
        _ => ("✓", "\x1b[32m"),
    };
    format!(
        "{color}{icon} {} ({synced} ok, {skipped} skipped, {failed} failed)\x1b[0m",
        batch.name
    )
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error);

    fn record_batch(&self, name: &str, counts: BatchCounts) {
        self.record_batch(name, counts);
    }
}
