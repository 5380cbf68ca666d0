//! Per-file outcomes of a sync batch.

use std::path::PathBuf;

use crate::logging::BatchCounts;

/// What happened to a single matched file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The file was copied or removed.
    Synced {
        /// Stash location of the overwritten working-tree file, for restores.
        stashed: Option<PathBuf>,
    },
    /// The file was intentionally left alone.
    Skipped {
        /// Human-readable reason.
        reason: String,
    },
    /// An I/O operation on the file failed.
    Failed {
        /// Human-readable reason.
        reason: String,
    },
}

/// A matched path and its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResult {
    /// Path relative to the working tree or profile.
    pub path: String,
    /// Outcome.
    pub outcome: FileOutcome,
}

/// Aggregated outcome of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// One entry per matched path, in match order.
    pub files: Vec<FileResult>,
}

impl SyncReport {
    pub(crate) fn push(&mut self, path: &str, outcome: FileOutcome) {
        self.files.push(FileResult {
            path: path.to_string(),
            outcome,
        });
    }

    /// Tally outcomes for the run summary.
    #[must_use]
    pub fn counts(&self) -> BatchCounts {
        let mut counts = BatchCounts::default();
        for f in &self.files {
            match f.outcome {
                FileOutcome::Synced { .. } => counts.synced += 1,
                FileOutcome::Skipped { .. } => counts.skipped += 1,
                FileOutcome::Failed { .. } => counts.failed += 1,
            }
        }
        counts
    }

    /// Paths that were synced.
    #[must_use]
    pub fn synced_paths(&self) -> Vec<&str> {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Synced { .. }))
            .map(|f| f.path.as_str())
            .collect()
    }

    /// Stash locations created during a restore.
    #[must_use]
    pub fn stashed(&self) -> Vec<&PathBuf> {
        self.files
            .iter()
            .filter_map(|f| match &f.outcome {
                FileOutcome::Synced { stashed } => stashed.as_ref(),
                _ => None,
            })
            .collect()
    }
}
