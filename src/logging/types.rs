//! Core logging types: batch entries, counts, and the [`Log`] trait.

/// Per-file tallies of a single sync batch (save, restore, clear, download).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchCounts {
    /// Files that were written, restored, or deleted.
    pub synced: usize,
    /// Files that were skipped (unsafe path, source vanished).
    pub skipped: usize,
    /// Files whose individual operation failed.
    pub failed: usize,
}

impl BatchCounts {
    /// Total number of files the batch looked at.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.synced + self.skipped + self.failed
    }
}

/// Batch result recorded for the end-of-command summary.
#[derive(Debug, Clone)]
pub struct BatchEntry {
    /// Human-readable batch name, e.g. `save → default`.
    pub name: String,
    /// Per-file tallies.
    pub counts: BatchCounts,
}

/// Abstraction over logging backends.
///
/// The sync engine, the config manager and the command handlers all log
/// through this trait, so tests can substitute an in-memory recorder for the
/// tracing-backed [`Logger`](super::logger::Logger).
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message. Warnings never change the exit status.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Record a batch result for the summary.
    fn record_batch(&self, name: &str, counts: BatchCounts);
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn batch_counts_total() {
        let counts = BatchCounts {
            synced: 3,
            skipped: 1,
            failed: 2,
        };
        assert_eq!(counts.total(), 6);
        assert_eq!(BatchCounts::default().total(), 0);
    }

    #[test]
    fn batch_entry_clone() {
        let entry = BatchEntry {
            name: "save → default".to_string(),
            counts: BatchCounts {
                synced: 1,
                ..BatchCounts::default()
            },
        };
        let cloned = entry.clone();
        assert_eq!(cloned.name, entry.name);
        assert_eq!(cloned.counts, entry.counts);
    }
}
