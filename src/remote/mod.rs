//! Profiles published in a GitHub repository under `profiles/<name>/`.
//!
//! [`RemoteSource`] is the seam between the download flow and the network;
//! production code uses [`GitHubSource`], tests use `MockRemoteSource`.
pub mod download;
pub mod github;

use serde::Deserialize;

use crate::error::RemoteError;

pub use download::download_profile;
pub use github::GitHubSource;

/// Largest file accepted from the remote repository, in bytes.
pub const MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Optional `profiles/<name>/files.json` listing a profile's files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    /// Manifest format version; must be non-empty.
    pub version: String,
    /// Paths relative to the profile directory.
    pub files: Vec<String>,
}

impl Manifest {
    /// Parse a manifest body, returning `None` for anything unusable.
    #[must_use]
    pub fn parse(body: &str) -> Option<Self> {
        let manifest: Self = serde_json::from_str(body).ok()?;
        if manifest.version.is_empty() {
            return None;
        }
        Some(manifest)
    }
}

/// Read access to a remote profile repository.
#[cfg_attr(test, mockall::automock)]
pub trait RemoteSource {
    /// Names of the directories under `profiles/`.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] on HTTP, network or parse failure.
    fn list_profiles(&self) -> Result<Vec<String>, RemoteError>;

    /// The profile's manifest, or `None` if it is absent or unusable.
    fn fetch_manifest(&self, profile: &str) -> Option<Manifest>;

    /// Every file path (repository-relative) under `profiles/<profile>/`.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] on HTTP, network or parse failure.
    fn list_files(&self, profile: &str) -> Result<Vec<String>, RemoteError>;

    /// Content of the repository file at `repo_path`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::FileTooLarge`] above [`MAX_FILE_SIZE`], or
    /// another [`RemoteError`] on HTTP or network failure.
    fn download(&self, repo_path: &str) -> Result<Vec<u8>, RemoteError>;
}

/// Mask a token for display: `ghp_****...xyz`, or `****` when short.
#[must_use]
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 7 {
        return "****".to_string();
    }
    let prefix: String = chars.iter().take(4).collect();
    let suffix: String = chars.iter().skip(chars.len() - 3).collect();
    format!("{prefix}****...{suffix}")
}
