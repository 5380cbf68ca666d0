//! On-disk layout of an airc workspace.
//!
//! Every path the tool touches hangs off an explicit workspace root rather
//! than the process working directory.

use std::path::{Path, PathBuf};

/// Name of the state directory under the workspace root.
pub const STATE_DIR: &str = ".airc";
/// Name of the config record inside the state directory.
pub const CONFIG_FILE: &str = "config.json";
/// Name of the sync rule file inside the state directory.
pub const SYNC_FILE: &str = ".sync";
/// Name of the profiles root inside the state directory.
pub const PROFILES_DIR: &str = "profiles";
/// Name of the stash root inside the state directory.
pub const STASH_DIR: &str = "stash";
/// Profile created by `airc init`.
pub const DEFAULT_PROFILE: &str = "default";

/// A workspace rooted at a directory holding the synchronised files and the
/// `.airc/` state directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Create a workspace rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The working tree root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/.airc`
    #[must_use]
    pub fn state_dir(&self) -> PathBuf {
        self.root.join(STATE_DIR)
    }

    /// `<root>/.airc/config.json`
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.state_dir().join(CONFIG_FILE)
    }

    /// `<root>/.airc/.sync`
    #[must_use]
    pub fn sync_path(&self) -> PathBuf {
        self.state_dir().join(SYNC_FILE)
    }

    /// `<root>/.airc/profiles`
    #[must_use]
    pub fn profiles_dir(&self) -> PathBuf {
        self.state_dir().join(PROFILES_DIR)
    }

    /// `<root>/.airc/stash`
    #[must_use]
    pub fn stash_dir(&self) -> PathBuf {
        self.state_dir().join(STASH_DIR)
    }
}
