//! Subcommand handlers and the setup they share.
pub mod clear;
pub mod delete;
pub mod init;
pub mod list;
pub mod new;
pub mod remote;
pub mod rename;
pub mod restore;
pub mod switch;
pub mod version;

use std::io::{self, Write as _};
use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::{LocalConfig, LocalConfigManager};
use crate::logging::Logger;
use crate::operations::SystemFileOps;
use crate::sync::SyncEngine;
use crate::workspace::Workspace;

/// Environment variable overriding the workspace root.
pub const ROOT_ENV: &str = "AIRC_ROOT";

/// Shared state produced by the common command setup sequence.
///
/// Resolves the workspace and runs the initialisation gate so that each
/// command does not have to repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// The resolved workspace.
    pub workspace: Workspace,
    /// Config manager for the workspace.
    pub manager: LocalConfigManager,
    /// Config as read (and possibly migrated) by the gate.
    pub config: LocalConfig,
}

impl CommandSetup {
    /// Resolve the workspace root and require a valid `.airc/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be determined or the workspace
    /// fails [`LocalConfigManager::ensure_initialized`].
    pub fn init(global: &GlobalOpts, log: &Logger) -> Result<Self> {
        let workspace = Workspace::new(resolve_root(global)?);
        log.debug(&format!("workspace: {}", workspace.root().display()));

        let manager = LocalConfigManager::new(&workspace);
        let config = manager.ensure_initialized()?;
        log.debug(&format!("current profile: {}", config.current));

        Ok(Self {
            workspace,
            manager,
            config,
        })
    }

    /// A sync engine over the real filesystem.
    #[must_use]
    pub fn engine<'a>(&self, log: &'a Logger) -> SyncEngine<'a> {
        SyncEngine::new(&self.workspace, &SystemFileOps, log)
    }
}

/// Determine the workspace root: `--root`, then `$AIRC_ROOT`, then the
/// current directory.
///
/// # Errors
///
/// Returns an error if the current directory cannot be read.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    if let Some(ref root) = global.root {
        return Ok(root.clone());
    }
    if let Ok(root) = std::env::var(ROOT_ENV)
        && !root.is_empty()
    {
        return Ok(PathBuf::from(root));
    }
    std::env::current_dir().context("cannot determine the current directory")
}

/// Ask a yes/no question on stdin; only `y` or `yes` confirm.
///
/// # Errors
///
/// Returns an error if stdout cannot be flushed or stdin cannot be read.
#[allow(clippy::print_stdout)]
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} (y/N): ");
    io::stdout().flush().context("flushing stdout")?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("reading confirmation")?;
    Ok(is_yes(&input))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
