//! Command: create or repair `.airc/`.
use anyhow::{Context as _, Result};

use super::resolve_root;
use crate::cli::{GlobalOpts, InitOpts};
use crate::config::LocalConfigManager;
use crate::logging::Logger;
use crate::operations::SystemFileOps;
use crate::sync::SyncEngine;
use crate::workspace::{DEFAULT_PROFILE, Workspace};

/// Run the init command.
///
/// # Errors
///
/// Returns an error if the state directory cannot be written, or if a
/// requested repair fails.
pub fn run(global: &GlobalOpts, opts: &InitOpts, log: &Logger) -> Result<()> {
    let workspace = Workspace::new(resolve_root(global)?);
    let manager = LocalConfigManager::new(&workspace);

    if manager.is_initialized() {
        if opts.force {
            repair(&manager, log)?;
        } else {
            log.warn("already initialised (use `airc init -f` to check and repair)");
        }
        return Ok(());
    }

    initialize(&manager, log)?;
    log.print_summary();
    Ok(())
}

/// Write the default config and rule file, then snapshot the working tree
/// into the `default` profile.
///
/// # Errors
///
/// Returns an error if any part of `.airc/` cannot be written.
pub fn initialize(manager: &LocalConfigManager, log: &Logger) -> Result<()> {
    log.stage("Initialising .airc");
    manager.init()?;
    let rules = manager.rules();
    rules
        .init()
        .with_context(|| format!("writing {}", rules.path().display()))?;
    manager.profiles().create(DEFAULT_PROFILE)?;

    let patterns = rules
        .read_patterns()
        .with_context(|| format!("reading {}", rules.path().display()))?;
    let report = SyncEngine::new(manager.workspace(), &SystemFileOps, log)
        .save_to_profile(DEFAULT_PROFILE, &patterns)?;
    log.debug(&format!(
        "saved {} files into \"{DEFAULT_PROFILE}\"",
        report.synced_paths().len()
    ));

    log.info("initialisation complete");
    Ok(())
}

/// Regenerate an unreadable `.sync` and replace an unusable config with one
/// pointing at a fresh snapshot.
///
/// # Errors
///
/// Returns an error if the rule file cannot be rewritten or the config
/// repair fails.
pub fn repair(manager: &LocalConfigManager, log: &Logger) -> Result<()> {
    log.stage("Checking .airc");
    let rules = manager.rules();
    if rules.is_valid() {
        log.info(".sync is fine");
    } else {
        rules
            .init()
            .with_context(|| format!("writing {}", rules.path().display()))?;
        log.warn("regenerated .sync from the default template");
    }

    let healthy = manager
        .read()
        .is_ok_and(|load| manager.is_config_valid(&load.into_config()));
    if healthy {
        log.info("config.json is fine");
    } else {
        let name = manager.repair_config(&SystemFileOps, log)?;
        log.warn(&format!(
            "repaired config.json and created profile \"{name}\" from the current files"
        ));
    }

    log.info("repair complete");
    Ok(())
}
