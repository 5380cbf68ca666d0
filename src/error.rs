//! Domain-specific error types for the profile synchronizer.
//!
//! Internal modules return typed errors (e.g. [`InitError`], [`SyncError`])
//! while command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! AircError
//! ├── Init(InitError)       — .airc/ state directory, config.json, .sync
//! ├── Profile(ProfileError) — profile naming and directory lifecycle
//! ├── Sync(SyncError)       — batch-level save / restore / clear failures
//! └── Remote(RemoteError)   — GitHub listing and downloads
//! ```
//!
//! Per-file problems inside a batch are never errors; they are reported as
//! [`FileOutcome`](crate::sync::FileOutcome) values instead.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum AircError {
    /// Initialisation state error.
    #[error(transparent)]
    Init(#[from] InitError),

    /// Profile lifecycle error.
    #[error(transparent)]
    Profile(#[from] ProfileError),

    /// Batch-level sync error.
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// Remote repository error.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Reasons why `.airc/` cannot be used as-is.
///
/// Every message names the command that fixes it.
#[derive(Error, Debug)]
pub enum InitError {
    /// `.airc/` does not exist.
    #[error(".airc/ is not initialised yet.\nRun `airc init` to initialise it.")]
    Uninitialized,

    /// `config.json` is missing, unreadable, or not valid JSON.
    #[error(
        "config.json is missing or malformed.\n\
         Fix it manually or run `airc init -f` \
         (a new profile is created from the current files according to .sync)."
    )]
    InvalidConfig {
        /// Underlying read or parse failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// `config.json` parses but its content is not usable.
    #[error(
        "config.json has invalid content.\n\
         Fix it in one of the following ways:\n\
         - automatic: run `airc init -f` (a new profile is created from the current files)\n\
         - manual:\n  \
           1. (optional) back up the current files\n  \
           2. set the `current` field to a profile that exists under .airc/profiles/\n  \
           3. (optional) create a new profile with `airc new <profile-name>` and copy the backup into it"
    )]
    InvalidConfigContent,

    /// `.sync` is missing or unreadable.
    #[error(
        ".sync is missing or malformed.\n\
         Fix it manually or run `airc init -f` (the default .sync is regenerated)."
    )]
    InvalidSyncFile,

    /// Config repair was requested while `.sync` is itself invalid.
    #[error(
        ".sync is invalid, so config.json cannot be repaired.\n\
         Restore .sync manually or run `airc init -f` to regenerate it first."
    )]
    SyncFileRequired,

    /// Writing the state directory failed.
    #[error("failed to write {path}: {source}")]
    Io {
        /// File or directory that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors from the profile store and the commands that manage profiles.
#[derive(Error, Debug)]
pub enum ProfileError {
    /// Name contains characters outside the allow-list.
    #[error("invalid profile name: {0}")]
    InvalidName(String),

    /// A profile with that name already exists.
    #[error("profile \"{0}\" already exists")]
    AlreadyExists(String),

    /// No profile with that name exists.
    #[error("profile \"{0}\" not found")]
    NotFound(String),

    /// The active profile cannot be deleted.
    #[error("cannot delete the active profile \"{0}\"; switch to another profile first")]
    Active(String),

    /// A non-"not found" filesystem error.
    #[error("profile storage error at {path}: {source}")]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Batch-level failures of the file sync engine.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The source or destination profile does not exist.
    #[error("profile \"{name}\" does not exist. Create it with `airc new {name}`.")]
    ProfileNotFound {
        /// Requested profile name.
        name: String,
    },

    /// The rule file exists but could not be read.
    #[error("cannot read sync rules at {path}: {source}")]
    RuleFile {
        /// Path of the rule file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Profile existence could not be determined.
    #[error(transparent)]
    Profile(#[from] ProfileError),
}

/// Errors from the remote profile repository.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// `airc remote` was called without a profile name.
    #[error(
        "specify a profile name\n\
         usage: airc remote <profile>\n\
         remote profiles: airc remote --list"
    )]
    NameRequired,

    /// A local profile would be overwritten by the download.
    #[error(
        "profile \"{0}\" already exists\n\
         The download was cancelled to avoid overwriting the local profile.\n\
         To download it again, delete or rename the existing profile:\n  \
         - airc delete {0}\n  \
         - airc rename {0} <new-name>"
    )]
    LocalProfileExists(String),

    /// The requested resource returned 404.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The GitHub API rate limit was hit.
    #[error("GitHub API rate limit reached.\nRetry after: {reset}")]
    RateLimited {
        /// Human-readable reset time.
        reset: String,
    },

    /// Any other non-success status.
    #[error("GitHub API error ({0})")]
    Status(u16),

    /// Transport-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// The response body could not be parsed.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// A file exceeded the download size limit.
    #[error("file too large: {path} (limit: {limit_mb}MB)")]
    FileTooLarge {
        /// Local path of the offending file.
        path: String,
        /// Limit in MiB.
        limit_mb: u64,
    },

    /// A single file could not be downloaded.
    #[error("download failed: {path} ({reason})")]
    Download {
        /// Local path of the file.
        path: String,
        /// Underlying failure.
        reason: String,
    },

    /// A repository path escaped the profile or was otherwise unsafe.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Writing a downloaded file failed.
    #[error("failed to write {path}: {source}")]
    Io {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn uninitialized_names_init_command() {
        let e = InitError::Uninitialized;
        assert!(e.to_string().contains("airc init"));
    }

    #[test]
    fn config_errors_name_repair_command() {
        let unreadable = InitError::InvalidConfig {
            source: "expected value at line 1".into(),
        };
        assert!(unreadable.to_string().contains("airc init -f"));
        assert!(InitError::InvalidConfigContent.to_string().contains("airc init -f"));
        assert!(InitError::InvalidSyncFile.to_string().contains("airc init -f"));
    }

    #[test]
    fn invalid_config_has_source() {
        use std::error::Error as StdError;
        let e = InitError::InvalidConfig {
            source: Box::new(io::Error::new(io::ErrorKind::NotFound, "missing")),
        };
        assert!(e.source().is_some());
    }

    #[test]
    fn profile_not_found_suggests_new() {
        let e = SyncError::ProfileNotFound {
            name: "work".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "profile \"work\" does not exist. Create it with `airc new work`."
        );
    }

    #[test]
    fn active_profile_message() {
        let e = ProfileError::Active("default".to_string());
        assert!(e.to_string().contains("switch to another profile"));
    }

    #[test]
    fn local_profile_exists_lists_remedies() {
        let e = RemoteError::LocalProfileExists("team".to_string());
        let msg = e.to_string();
        assert!(msg.contains("airc delete team"));
        assert!(msg.contains("airc rename team <new-name>"));
    }

    #[test]
    fn file_too_large_display() {
        let e = RemoteError::FileTooLarge {
            path: ".claude/big.bin".to_string(),
            limit_mb: 1,
        };
        assert_eq!(e.to_string(), "file too large: .claude/big.bin (limit: 1MB)");
    }

    #[test]
    fn aggregate_is_transparent() {
        let e: AircError = InitError::Uninitialized.into();
        assert_eq!(e.to_string(), InitError::Uninitialized.to_string());
        let e: AircError = ProfileError::NotFound("x".to_string()).into();
        assert!(e.to_string().contains("not found"));
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<AircError>();
        assert_send_sync::<InitError>();
        assert_send_sync::<ProfileError>();
        assert_send_sync::<SyncError>();
        assert_send_sync::<RemoteError>();
    }

    #[test]
    fn errors_convert_to_anyhow() {
        let _a: anyhow::Error = InitError::InvalidSyncFile.into();
        let _b: anyhow::Error = RemoteError::Status(500).into();
    }
}
