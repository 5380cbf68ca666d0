//! Command: `use`, switching the working tree to another profile.
use anyhow::{Context as _, Result};

use super::CommandSetup;
use crate::cli::{GlobalOpts, NameArg};
use crate::error::SyncError;
use crate::logging::Logger;

/// Run the use command.
///
/// # Errors
///
/// Returns an error if the workspace is not usable, the target profile does
/// not exist, or a batch-level sync step fails.
pub fn run(global: &GlobalOpts, opts: &NameArg, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    if switch_profile(&setup, &opts.name, log)? {
        log.print_summary();
        log.info(&format!("switched to profile \"{}\"", opts.name));
    } else {
        log.info(&format!("already using profile \"{}\"", opts.name));
    }
    Ok(())
}

/// Save the working tree into the current profile, clear it, point the
/// config at `target` and restore `target`.
///
/// Returns `false` without touching anything when `target` is already
/// current.
///
/// # Errors
///
/// Returns [`SyncError::ProfileNotFound`] before any file is touched if
/// `target` does not exist, or the first batch-level failure.
pub fn switch_profile(setup: &CommandSetup, target: &str, log: &Logger) -> Result<bool> {
    let current = setup.config.current.as_str();
    if current == target {
        return Ok(false);
    }

    let profiles = setup.manager.profiles();
    if !profiles.exists(target)? {
        return Err(SyncError::ProfileNotFound {
            name: target.to_string(),
        }
        .into());
    }

    let rules = setup.manager.rules();
    let patterns = rules
        .read_patterns()
        .with_context(|| format!("reading {}", rules.path().display()))?;
    let engine = setup.engine(log);

    log.stage(&format!("Saving \"{current}\""));
    engine.save_to_profile(current, &patterns)?;

    log.stage("Clearing working tree");
    let cleared = engine.clear_files(&patterns);
    log.debug(&format!("cleared {} files", cleared.synced_paths().len()));

    setup.manager.set_current(target)?;

    log.stage(&format!("Restoring \"{target}\""));
    let restored = engine.restore_from_profile(target)?;
    for stash in restored.stashed() {
        log.info(&format!("previous content kept at {}", stash.display()));
    }
    Ok(true)
}
