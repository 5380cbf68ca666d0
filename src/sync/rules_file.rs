//! Persistence of the `.sync` rule file.

use std::io;
use std::path::{Path, PathBuf};

use super::patterns::{DEFAULT_TEMPLATE, SyncPattern};
use crate::workspace::Workspace;

/// Reads and writes `<root>/.airc/.sync`.
#[derive(Debug, Clone)]
pub struct SyncFileStore {
    path: PathBuf,
}

impl SyncFileStore {
    /// Create a store for `workspace`.
    #[must_use]
    pub fn new(workspace: &Workspace) -> Self {
        Self {
            path: workspace.sync_path(),
        }
    }

    /// Location of the rule file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse the rule file, falling back to [`DEFAULT_TEMPLATE`] when it does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns any read error other than "not found".
    pub fn read_patterns(&self) -> io::Result<SyncPattern> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(SyncPattern::parse(&content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Ok(SyncPattern::parse(DEFAULT_TEMPLATE))
            }
            Err(e) => Err(e),
        }
    }

    /// Returns `true` if the rule file exists and is readable as text.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        std::fs::read_to_string(&self.path).is_ok()
    }

    /// Overwrite the rule file with `content`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self, content: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, content)
    }

    /// Write [`DEFAULT_TEMPLATE`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn init(&self) -> io::Result<()> {
        self.write(DEFAULT_TEMPLATE)
    }
}
