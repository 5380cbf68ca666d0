//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileOps`] trait so that the sync engine can be unit-tested
//! against injected failures without relying on platform permission tricks.
//! Production code uses [`SystemFileOps`]; tests use `FaultyFileOps`.

use std::io;
use std::path::Path;

/// Permission bits applied to every file written into the working tree or a
/// profile.
pub const FILE_MODE: u32 = 0o644;

/// Abstraction over the file-level I/O performed by the sync engine.
///
/// Every method works on absolute paths; callers are responsible for joining
/// relative paths onto the workspace or profile root.
pub trait FileOps: Send + Sync + std::fmt::Debug {
    /// Returns `true` if a file, directory or symlink exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Read the full content of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Write `contents` to `path`, creating or truncating the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Apply [`FILE_MODE`] to `path`. A no-op on platforms without Unix modes.
    ///
    /// # Errors
    ///
    /// Returns an error if the permissions cannot be changed.
    fn set_standard_permissions(&self, path: &Path) -> io::Result<()>;

    /// Create `path` and all missing parents.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Move the file at `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns an error if neither a rename nor a copy-and-remove succeeds.
    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Remove the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    fn remove_file(&self, path: &Path) -> io::Result<()>;
}

/// Production [`FileOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFileOps;

impl FileOps for SystemFileOps {
    fn exists(&self, path: &Path) -> bool {
        path.symlink_metadata().is_ok()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        std::fs::write(path, contents)
    }

    #[cfg(unix)]
    fn set_standard_permissions(&self, path: &Path) -> io::Result<()> {
        use std::os::unix::fs::PermissionsExt as _;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(FILE_MODE))
    }

    #[cfg(not(unix))]
    fn set_standard_permissions(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        // rename fails across filesystems (EXDEV); fall back to copy + remove
        if std::fs::rename(from, to).is_ok() {
            return Ok(());
        }
        std::fs::copy(from, to)?;
        std::fs::remove_file(from)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}

/// Test [`FileOps`] that delegates to [`SystemFileOps`] but fails selected
/// operations for paths ending in a configured suffix.
///
/// # Example
///
/// ```ignore
/// let ops = FaultyFileOps::new().fail_moves_for("CLAUDE.md");
/// ```
#[cfg(test)]
#[derive(Debug, Default)]
pub struct FaultyFileOps {
    fail_read: Vec<String>,
    fail_write: Vec<String>,
    fail_move: Vec<String>,
    fail_remove: Vec<String>,
}

#[cfg(test)]
impl FaultyFileOps {
    /// Create a wrapper that fails nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail reads of paths ending in `suffix`.
    #[must_use]
    pub fn fail_reads_for(mut self, suffix: &str) -> Self {
        self.fail_read.push(suffix.to_string());
        self
    }

    /// Fail writes to paths ending in `suffix`.
    #[must_use]
    pub fn fail_writes_for(mut self, suffix: &str) -> Self {
        self.fail_write.push(suffix.to_string());
        self
    }

    /// Fail moves whose source ends in `suffix`.
    #[must_use]
    pub fn fail_moves_for(mut self, suffix: &str) -> Self {
        self.fail_move.push(suffix.to_string());
        self
    }

    /// Fail removal of paths ending in `suffix`.
    #[must_use]
    pub fn fail_removes_for(mut self, suffix: &str) -> Self {
        self.fail_remove.push(suffix.to_string());
        self
    }

    fn check(list: &[String], path: &Path) -> io::Result<()> {
        let p = path.to_string_lossy().replace('\\', "/");
        if list.iter().any(|s| p.ends_with(s.as_str())) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "injected failure",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
impl FileOps for FaultyFileOps {
    fn exists(&self, path: &Path) -> bool {
        SystemFileOps.exists(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        Self::check(&self.fail_read, path)?;
        SystemFileOps.read(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        Self::check(&self.fail_write, path)?;
        SystemFileOps.write(path, contents)
    }

    fn set_standard_permissions(&self, path: &Path) -> io::Result<()> {
        SystemFileOps.set_standard_permissions(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        SystemFileOps.create_dir_all(path)
    }

    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        Self::check(&self.fail_move, from)?;
        SystemFileOps.move_file(from, to)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        Self::check(&self.fail_remove, path)?;
        SystemFileOps.remove_file(path)
    }
}
