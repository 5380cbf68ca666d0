//! Command: rename a profile.
use anyhow::Result;

use super::CommandSetup;
use crate::cli::{GlobalOpts, RenameOpts};
use crate::logging::Logger;
use crate::profiles::validate_name;

/// Run the rename command.
///
/// # Errors
///
/// Returns an error if the workspace is not usable, the new name is invalid
/// or taken, the old profile is missing, or the config cannot be updated.
pub fn run(global: &GlobalOpts, opts: &RenameOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    rename_profile(&setup, &opts.old, &opts.new)?;
    log.info(&format!("renamed profile \"{}\" to \"{}\"", opts.old, opts.new));
    Ok(())
}

/// Rename the profile directory and follow it with `current` if it was the
/// active profile.
///
/// # Errors
///
/// Returns the store or config error that stopped the rename.
pub fn rename_profile(setup: &CommandSetup, old: &str, new: &str) -> Result<()> {
    validate_name(new)?;
    setup.manager.profiles().rename(old, new)?;
    if setup.config.current == old {
        setup.manager.set_current(new)?;
    }
    Ok(())
}
