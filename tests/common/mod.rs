// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed workspace and a fluent builder so
// each integration test can set up an isolated `.airc/` without repeating
// filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use airc_cli::cli::GlobalOpts;
use airc_cli::commands::CommandSetup;
use airc_cli::config::LocalConfigManager;
use airc_cli::logging::Logger;
use airc_cli::workspace::Workspace;

/// A logger that prints nothing and keeps no log file.
pub fn quiet_logger() -> Logger {
    Logger::with_log_file(None)
}

/// An isolated workspace backed by a [`tempfile::TempDir`].
///
/// The directory is deleted when dropped.
pub struct IntegrationTestContext {
    /// Temporary directory used as the workspace root.
    pub root: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create an empty, uninitialised workspace.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Path to the workspace root.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Global options pointing `--root` at this workspace.
    pub fn global(&self) -> GlobalOpts {
        GlobalOpts {
            root: Some(self.root.path().to_path_buf()),
        }
    }

    /// Workspace handle for this root.
    pub fn workspace(&self) -> Workspace {
        Workspace::new(self.root.path())
    }

    /// Config manager for this root.
    pub fn manager(&self) -> LocalConfigManager {
        LocalConfigManager::new(&self.workspace())
    }

    /// Run the initialisation gate, as every command does.
    pub fn setup(&self, log: &Logger) -> CommandSetup {
        CommandSetup::init(&self.global(), log).expect("workspace is initialised")
    }

    /// Write `content` to `rel` under the workspace root.
    pub fn write(&self, rel: &str, content: &str) {
        write_file(&self.root.path().join(rel), content);
    }

    /// Read `rel` under the workspace root, or `None` if absent.
    pub fn read(&self, rel: &str) -> Option<String> {
        std::fs::read_to_string(self.root.path().join(rel)).ok()
    }

    /// Path of `rel` inside profile `name`.
    pub fn profile_file(&self, name: &str, rel: &str) -> PathBuf {
        self.workspace().profiles_dir().join(name).join(rel)
    }

    /// Current profile recorded in `config.json`.
    pub fn current(&self) -> String {
        self.manager()
            .read()
            .expect("read config")
            .into_config()
            .current
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write file");
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
    rules: Option<String>,
    initialise: bool,
}

impl TestContextBuilder {
    /// Begin building an empty workspace.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
            rules: None,
            initialise: false,
        }
    }

    /// Add a working-tree file.
    pub fn with_file(self, rel: &str, content: &str) -> Self {
        self.ctx.write(rel, content);
        self
    }

    /// Replace the default `.sync` after initialisation.
    pub fn with_rules(mut self, rules: &str) -> Self {
        self.rules = Some(rules.to_string());
        self
    }

    /// Run `airc init` on the workspace.
    pub fn initialised(mut self) -> Self {
        self.initialise = true;
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        if self.initialise {
            airc_cli::commands::init::initialize(&self.ctx.manager(), &quiet_logger())
                .expect("initialise workspace");
        }
        if let Some(rules) = &self.rules {
            write_file(&self.ctx.workspace().sync_path(), rules);
        }
        self.ctx
    }
}
