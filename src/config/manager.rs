//! Initialisation, validation and repair of `.airc/`.
//!
//! The workspace is in one of three states:
//!
//! | state | detected by |
//! |---|---|
//! | uninitialised | `.airc/` absent |
//! | corrupt | config unreadable or invalid, or `.sync` unreadable |
//! | valid | [`LocalConfigManager::ensure_initialized`] succeeds |
//!
//! Repair never patches individual fields. It snapshots the working tree into
//! a fresh `tmp` profile and replaces the whole record.

use super::{LocalConfig, RepoConfig, StoredConfig};
use crate::error::{AircError, InitError, ProfileError};
use crate::logging::Log;
use crate::operations::FileOps;
use crate::profiles::ProfileStore;
use crate::sync::{SyncEngine, SyncFileStore};
use crate::workspace::Workspace;

/// Base name for profiles created by [`LocalConfigManager::repair_config`].
const TMP_PROFILE: &str = "tmp";

/// Outcome of reading `config.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLoad {
    /// The record was read as-is.
    Loaded(LocalConfig),
    /// `repo` was absent; defaults were filled in and written back.
    Migrated(LocalConfig),
}

impl ConfigLoad {
    /// The config, regardless of how it was obtained.
    #[must_use]
    pub fn into_config(self) -> LocalConfig {
        match self {
            Self::Loaded(c) | Self::Migrated(c) => c,
        }
    }
}

/// Owns `config.json` and the initialisation checks around it.
#[derive(Debug, Clone)]
pub struct LocalConfigManager {
    workspace: Workspace,
    profiles: ProfileStore,
    rules: SyncFileStore,
}

impl LocalConfigManager {
    /// Create a manager for `workspace`.
    #[must_use]
    pub fn new(workspace: &Workspace) -> Self {
        Self {
            workspace: workspace.clone(),
            profiles: ProfileStore::new(workspace),
            rules: SyncFileStore::new(workspace),
        }
    }

    /// Returns `true` if `.airc/` exists.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.workspace.state_dir().exists()
    }

    /// Read `config.json`, migrating a missing `repo` object.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::InvalidConfig`] if the file cannot be read or
    /// parsed, or [`InitError::Io`] if the migrated record cannot be written.
    pub fn read(&self) -> Result<ConfigLoad, InitError> {
        let path = self.workspace.config_path();
        let content = std::fs::read_to_string(&path).map_err(|e| InitError::InvalidConfig {
            source: Box::new(e),
        })?;
        let stored: StoredConfig =
            serde_json::from_str(&content).map_err(|e| InitError::InvalidConfig {
                source: Box::new(e),
            })?;

        let current = stored.current.unwrap_or_default();
        match stored.repo {
            Some(repo) => Ok(ConfigLoad::Loaded(LocalConfig { current, repo })),
            None => {
                let config = LocalConfig {
                    current,
                    repo: RepoConfig::default(),
                };
                self.write(&config)?;
                Ok(ConfigLoad::Migrated(config))
            }
        }
    }

    /// Write `config` to `config.json`, creating `.airc/` if needed.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::Io`] if the directory or file cannot be written.
    pub fn write(&self, config: &LocalConfig) -> Result<(), InitError> {
        let dir = self.workspace.state_dir();
        std::fs::create_dir_all(&dir).map_err(|source| InitError::Io { path: dir, source })?;
        let path = self.workspace.config_path();
        let json = config
            .to_json()
            .map_err(|e| InitError::Io {
                path: path.clone(),
                source: e.into(),
            })?;
        std::fs::write(&path, json).map_err(|source| InitError::Io { path, source })
    }

    /// Write the default config.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::Io`] on write failure.
    pub fn init(&self) -> Result<(), InitError> {
        self.write(&LocalConfig::default())
    }

    /// Returns `true` if `current` names an existing profile and every
    /// repository field is non-blank.
    #[must_use]
    pub fn is_config_valid(&self, config: &LocalConfig) -> bool {
        let current = config.current.trim();
        !current.is_empty()
            && self.profiles.exists(&config.current).unwrap_or(false)
            && config.repo.is_complete()
    }

    /// Gate for every command that needs a usable workspace.
    ///
    /// Returns the (possibly migrated) config on success.
    ///
    /// # Errors
    ///
    /// Returns the first failing check, in order: [`InitError::Uninitialized`],
    /// [`InitError::InvalidConfig`], [`InitError::InvalidConfigContent`],
    /// [`InitError::InvalidSyncFile`].
    pub fn ensure_initialized(&self) -> Result<LocalConfig, InitError> {
        if !self.is_initialized() {
            return Err(InitError::Uninitialized);
        }
        let config = self.read()?.into_config();
        if !self.is_config_valid(&config) {
            return Err(InitError::InvalidConfigContent);
        }
        if !self.rules.is_valid() {
            return Err(InitError::InvalidSyncFile);
        }
        Ok(config)
    }

    /// First unused name among `tmp`, `tmp(1)`, `tmp(2)`, ...
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Io`] if the profiles root cannot be listed.
    pub fn generate_unique_tmp_name(&self) -> Result<String, ProfileError> {
        let existing = self.profiles.list()?;
        let taken = |name: &str| existing.iter().any(|p| p == name);
        if !taken(TMP_PROFILE) {
            return Ok(TMP_PROFILE.to_string());
        }
        let mut counter = 1_usize;
        loop {
            let candidate = format!("{TMP_PROFILE}({counter})");
            if !taken(&candidate) {
                return Ok(candidate);
            }
            counter += 1;
        }
    }

    /// Replace the config with one pointing at a fresh snapshot of the
    /// working tree. Returns the name of the new profile.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::SyncFileRequired`] if `.sync` is not valid, or any
    /// error from creating the profile, saving into it, or writing the config.
    pub fn repair_config(&self, ops: &dyn FileOps, log: &dyn Log) -> Result<String, AircError> {
        if !self.rules.is_valid() {
            return Err(InitError::SyncFileRequired.into());
        }

        let name = self.generate_unique_tmp_name()?;
        self.profiles.create(&name)?;
        log.debug(&format!("created recovery profile {name}"));

        let patterns = self
            .rules
            .read_patterns()
            .map_err(|_| InitError::InvalidSyncFile)?;
        SyncEngine::new(&self.workspace, ops, log).save_to_profile(&name, &patterns)?;

        self.write(&LocalConfig::pointing_at(&name))?;
        Ok(name)
    }

    /// Set `current` to `profile` and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be read or written.
    pub fn set_current(&self, profile: &str) -> Result<(), InitError> {
        let mut config = self.read()?.into_config();
        config.current = profile.to_string();
        self.write(&config)
    }

    /// Location of `config.json`.
    #[must_use]
    pub fn path(&self) -> std::path::PathBuf {
        self.workspace.config_path()
    }

    /// Workspace this manager operates on.
    #[must_use]
    pub const fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// The profile store of this workspace.
    #[must_use]
    pub const fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    /// The rule file store of this workspace.
    #[must_use]
    pub const fn rules(&self) -> &SyncFileStore {
        &self.rules
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::logging::RecordingLog;
    use crate::operations::SystemFileOps;
    use std::fs;

    struct Fixture {
        dir: tempfile::TempDir,
        mgr: LocalConfigManager,
    }

    impl Fixture {
        fn uninitialised() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let mgr = LocalConfigManager::new(&Workspace::new(dir.path()));
            Self { dir, mgr }
        }

        fn initialised() -> Self {
            let fx = Self::uninitialised();
            fx.mgr.init().unwrap();
            fx.mgr.rules().init().unwrap();
            fx.mgr.profiles().create("default").unwrap();
            fx
        }

        fn write_config(&self, json: &str) {
            fs::write(self.mgr.path(), json).unwrap();
        }
    }

    #[test]
    fn uninitialised_workspace() {
        let fx = Fixture::uninitialised();
        assert!(!fx.mgr.is_initialized());
        assert!(matches!(
            fx.mgr.ensure_initialized(),
            Err(InitError::Uninitialized)
        ));
    }

    #[test]
    fn valid_workspace_passes() {
        let fx = Fixture::initialised();
        let config = fx.mgr.ensure_initialized().unwrap();
        assert_eq!(config, LocalConfig::default());
    }

    #[test]
    fn unparseable_config() {
        let fx = Fixture::initialised();
        fx.write_config("{ not json");
        assert!(matches!(
            fx.mgr.ensure_initialized(),
            Err(InitError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn missing_config() {
        let fx = Fixture::initialised();
        fs::remove_file(fx.mgr.path()).unwrap();
        assert!(matches!(
            fx.mgr.ensure_initialized(),
            Err(InitError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn current_pointing_at_missing_profile() {
        let fx = Fixture::initialised();
        fx.mgr.write(&LocalConfig::pointing_at("ghost")).unwrap();
        assert!(matches!(
            fx.mgr.ensure_initialized(),
            Err(InitError::InvalidConfigContent)
        ));
    }

    #[test]
    fn blank_current_or_repo_field_is_invalid() {
        let fx = Fixture::initialised();
        assert!(!fx.mgr.is_config_valid(&LocalConfig::pointing_at("   ")));
        let mut config = LocalConfig::default();
        config.repo.owner = String::new();
        assert!(!fx.mgr.is_config_valid(&config));
    }

    #[test]
    fn missing_sync_file() {
        let fx = Fixture::initialised();
        fs::remove_file(fx.mgr.rules().path()).unwrap();
        assert!(matches!(
            fx.mgr.ensure_initialized(),
            Err(InitError::InvalidSyncFile)
        ));
    }

    #[test]
    fn config_without_repo_is_migrated_and_persisted() {
        let fx = Fixture::initialised();
        fx.write_config(r#"{"current":"default"}"#);

        let load = fx.mgr.read().unwrap();
        assert!(matches!(load, ConfigLoad::Migrated(_)));
        assert_eq!(load.into_config(), LocalConfig::default());

        let on_disk = fs::read_to_string(fx.mgr.path()).unwrap();
        assert_eq!(on_disk, LocalConfig::default().to_json().unwrap());
        assert!(matches!(fx.mgr.read().unwrap(), ConfigLoad::Loaded(_)));
    }

    #[test]
    fn tmp_names_skip_existing() {
        let fx = Fixture::initialised();
        assert_eq!(fx.mgr.generate_unique_tmp_name().unwrap(), "tmp");
        fx.mgr.profiles().create("tmp").unwrap();
        fx.mgr.profiles().create("tmp(1)").unwrap();
        assert_eq!(fx.mgr.generate_unique_tmp_name().unwrap(), "tmp(2)");
    }

    #[test]
    fn repair_snapshots_working_tree_into_fresh_profile() {
        let fx = Fixture::initialised();
        fx.mgr.profiles().create("tmp").unwrap();
        fs::write(fx.dir.path().join("CLAUDE.md"), "mine").unwrap();
        fx.mgr.write(&LocalConfig::pointing_at("ghost")).unwrap();
        let log = RecordingLog::default();

        let name = fx.mgr.repair_config(&SystemFileOps, &log).unwrap();

        assert_eq!(name, "tmp(1)");
        let config = fx.mgr.ensure_initialized().unwrap();
        assert_eq!(config.current, "tmp(1)");
        assert_eq!(
            fs::read_to_string(fx.mgr.profiles().path("tmp(1)").unwrap().join("CLAUDE.md")).unwrap(),
            "mine"
        );
    }

    #[test]
    fn repair_refuses_without_valid_sync_file() {
        let fx = Fixture::initialised();
        fs::remove_file(fx.mgr.rules().path()).unwrap();
        let log = RecordingLog::default();
        let err = fx.mgr.repair_config(&SystemFileOps, &log).unwrap_err();
        assert!(matches!(err, AircError::Init(InitError::SyncFileRequired)));
        assert_eq!(fx.mgr.profiles().list().unwrap(), vec!["default"]);
    }

    #[test]
    fn set_current_persists() {
        let fx = Fixture::initialised();
        fx.mgr.profiles().create("work").unwrap();
        fx.mgr.set_current("work").unwrap();
        assert_eq!(fx.mgr.ensure_initialized().unwrap().current, "work");
    }
}
