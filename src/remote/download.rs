//! Download a remote profile into local profile storage.
use std::path::Path;

use super::RemoteSource;
use crate::error::{AircError, ProfileError, RemoteError};
use crate::logging::{BatchCounts, Log};
use crate::profiles::{ProfileStore, is_valid_name};
use crate::sync::{is_valid_path, to_local_path};

/// Files named like this are documentation for the repository, not profile
/// content.
const README: &str = "README.md";

/// Download `profile` from `source` into a new local profile.
///
/// The file list comes from the profile's manifest when one exists, else
/// from a recursive directory walk. Any failure removes the partially
/// downloaded profile before the error is returned.
///
/// # Errors
///
/// Returns [`RemoteError::NameRequired`], [`ProfileError::InvalidName`] or
/// [`RemoteError::LocalProfileExists`] before touching the network, and any
/// [`RemoteError`] raised while listing or downloading files.
pub fn download_profile(
    source: &dyn RemoteSource,
    profiles: &ProfileStore,
    profile: &str,
    log: &dyn Log,
) -> Result<BatchCounts, AircError> {
    if profile.is_empty() {
        return Err(RemoteError::NameRequired.into());
    }
    if !is_valid_name(profile) {
        return Err(ProfileError::InvalidName(profile.to_string()).into());
    }
    if profiles.exists(profile)? {
        return Err(RemoteError::LocalProfileExists(profile.to_string()).into());
    }

    let dest = profiles.path(profile)?;
    profiles.create(profile)?;
    match fetch_into(source, &dest, profile, log) {
        Ok(counts) => {
            log.record_batch(&format!("download ← {profile}"), counts);
            Ok(counts)
        }
        Err(e) => {
            if let Err(cleanup) = profiles.delete(profile) {
                log.warn(&format!("failed to remove partial download: {cleanup}"));
            }
            Err(e.into())
        }
    }
}

fn fetch_into(
    source: &dyn RemoteSource,
    dest: &Path,
    profile: &str,
    log: &dyn Log,
) -> Result<BatchCounts, RemoteError> {
    let files = match source.fetch_manifest(profile) {
        Some(manifest) => {
            log.debug(&format!("using manifest version {}", manifest.version));
            manifest
                .files
                .iter()
                .map(|f| format!("profiles/{profile}/{f}"))
                .collect()
        }
        None => {
            log.debug("no manifest, walking repository contents");
            source.list_files(profile)?
        }
    };

    let mut counts = BatchCounts::default();
    for repo_path in &files {
        let rel = to_local_path(repo_path, profile)
            .ok_or_else(|| RemoteError::InvalidPath(repo_path.clone()))?;
        if rel.ends_with(README) {
            log.debug(&format!("skipping {rel}"));
            counts.skipped += 1;
            continue;
        }
        if !is_valid_path(&rel) {
            return Err(RemoteError::InvalidPath(rel));
        }

        let bytes = source.download(repo_path).map_err(|e| match e {
            RemoteError::FileTooLarge { limit_mb, .. } => RemoteError::FileTooLarge {
                path: rel.clone(),
                limit_mb,
            },
            RemoteError::Download { reason, .. } => RemoteError::Download {
                path: rel.clone(),
                reason,
            },
            other => other,
        })?;

        let target = dest.join(&rel);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|source| RemoteError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&target, bytes).map_err(|source| RemoteError::Io {
            path: target.clone(),
            source,
        })?;
        log.debug(&format!("downloaded {rel}"));
        counts.synced += 1;
    }
    Ok(counts)
}
