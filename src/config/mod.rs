//! The persisted `.airc/config.json` record and its manager.
pub mod manager;

use serde::{Deserialize, Serialize};

use crate::workspace::DEFAULT_PROFILE;

pub use manager::{ConfigLoad, LocalConfigManager};

/// Default remote repository owner.
pub const DEFAULT_REPO_OWNER: &str = "maru3460";
/// Default remote repository name.
pub const DEFAULT_REPO_NAME: &str = "airc";
/// Default remote repository branch.
pub const DEFAULT_REPO_BRANCH: &str = "main";

/// Remote repository settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoConfig {
    /// GitHub user or organisation.
    #[serde(default)]
    pub owner: String,
    /// Repository name.
    #[serde(default)]
    pub name: String,
    /// Branch profiles are read from.
    #[serde(default)]
    pub branch: String,
    /// GitHub token sent as a bearer credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            owner: DEFAULT_REPO_OWNER.to_string(),
            name: DEFAULT_REPO_NAME.to_string(),
            branch: DEFAULT_REPO_BRANCH.to_string(),
            token: None,
        }
    }
}

impl RepoConfig {
    /// Returns `true` if owner, name and branch are all non-blank.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [&self.owner, &self.name, &self.branch]
            .iter()
            .all(|s| !s.trim().is_empty())
    }
}

/// The whole config record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalConfig {
    /// Profile currently checked out into the working tree.
    pub current: String,
    /// Remote repository settings.
    pub repo: RepoConfig,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self::pointing_at(DEFAULT_PROFILE)
    }
}

impl LocalConfig {
    /// A config with default repository settings and `current` set to
    /// `profile`.
    #[must_use]
    pub fn pointing_at(profile: &str) -> Self {
        Self {
            current: profile.to_string(),
            repo: RepoConfig::default(),
        }
    }

    /// Render as two-space indented JSON with a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }
}

/// On-disk shape; `repo` may be absent in records written by older versions.
#[derive(Debug, Deserialize)]
pub(crate) struct StoredConfig {
    #[serde(default)]
    pub current: Option<String>,
    #[serde(default)]
    pub repo: Option<RepoConfig>,
}
