//! Named profile directories under `.airc/profiles/`.
//!
//! "Not found" is never an error here: existence and listing queries return
//! `false` or an empty list, and deletion of a missing profile succeeds. Any
//! other filesystem error propagates as [`ProfileError::Io`].
//!
//! Names are joined onto the profiles root only when they are a single plain
//! path component, so no name can reach outside `.airc/profiles/`.

use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::ProfileError;
use crate::workspace::Workspace;

/// CRUD over the profile directories of one workspace.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    root: PathBuf,
}

impl ProfileStore {
    /// Create a store over `<workspace>/.airc/profiles`.
    #[must_use]
    pub fn new(workspace: &Workspace) -> Self {
        Self {
            root: workspace.profiles_dir(),
        }
    }

    /// Directory holding every profile.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of profile `name`. Does not check existence.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::InvalidName`] if `name` is not a single plain
    /// path component.
    pub fn path(&self, name: &str) -> Result<PathBuf, ProfileError> {
        if is_plain_entry(name) {
            Ok(self.root.join(name))
        } else {
            Err(ProfileError::InvalidName(name.to_string()))
        }
    }

    /// Create profile `name`; succeeds if it already exists.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Io`] if the directory cannot be created.
    pub fn create(&self, name: &str) -> Result<(), ProfileError> {
        let path = self.path(name)?;
        std::fs::create_dir_all(&path).map_err(|source| ProfileError::Io { path, source })
    }

    /// Returns `true` iff profile `name` exists and is a directory.
    ///
    /// A name that cannot denote a profile directory never exists.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Io`] for failures other than "not found".
    pub fn exists(&self, name: &str) -> Result<bool, ProfileError> {
        let Ok(path) = self.path(name) else {
            return Ok(false);
        };
        match std::fs::metadata(&path) {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(ProfileError::Io { path, source }),
        }
    }

    /// Sorted names of every profile directory.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Io`] if the profiles root exists but cannot be
    /// read.
    pub fn list(&self) -> Result<Vec<String>, ProfileError> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(ProfileError::Io {
                    path: self.root.clone(),
                    source,
                });
            }
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ProfileError::Io {
                path: self.root.clone(),
                source,
            })?;
            if entry.file_type().is_ok_and(|t| t.is_dir()) {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Recursively remove profile `name`; succeeds if it is already absent.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::InvalidName`] for names that are not a plain
    /// path component, or [`ProfileError::Io`] if removal fails for another
    /// reason.
    pub fn delete(&self, name: &str) -> Result<(), ProfileError> {
        let path = self.path(name)?;
        match std::fs::remove_dir_all(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(ProfileError::Io { path, source }),
        }
    }

    /// Rename profile `old` to `new`.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::NotFound`] if `old` is missing,
    /// [`ProfileError::AlreadyExists`] if `new` exists, or
    /// [`ProfileError::Io`] if the rename fails.
    pub fn rename(&self, old: &str, new: &str) -> Result<(), ProfileError> {
        if !self.exists(old)? {
            return Err(ProfileError::NotFound(old.to_string()));
        }
        if self.exists(new)? {
            return Err(ProfileError::AlreadyExists(new.to_string()));
        }
        let from = self.path(old)?;
        let to = self.path(new)?;
        std::fs::rename(from, &to).map_err(|source| ProfileError::Io { path: to, source })
    }
}

/// A single `Normal` component with no separator of either platform.
fn is_plain_entry(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(components.next(), Some(Component::Normal(_)))
        && components.next().is_none()
        && !name.contains(['/', '\\'])
}

/// Returns `true` if `name` is a usable profile name.
///
/// Allowed: ASCII letters and digits, `_`, `-`, the long-vowel mark `ー`,
/// hiragana, full- and half-width katakana, and common CJK ideographs.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    !name.trim().is_empty() && name.chars().all(is_allowed_char)
}

const fn is_allowed_char(c: char) -> bool {
    matches!(c,
        'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-' | 'ー'
        | 'ぁ'..='ん'
        | 'ァ'..='ヶ'
        | 'ｧ'..='ﾟ'
        | '一'..='龠'
    )
}

/// Return `Ok(())` if `name` is valid, else [`ProfileError::InvalidName`].
///
/// # Errors
///
/// Returns [`ProfileError::InvalidName`] for names outside the allow-list.
pub fn validate_name(name: &str) -> Result<(), ProfileError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(ProfileError::InvalidName(name.to_string()))
    }
}
