//! Command: delete a profile.
use anyhow::Result;

use super::CommandSetup;
use crate::cli::{GlobalOpts, NameArg};
use crate::error::ProfileError;
use crate::logging::Logger;
use crate::profiles::ProfileStore;

/// Run the delete command.
///
/// # Errors
///
/// Returns an error if the workspace is not usable, the profile does not
/// exist, or it is the active profile.
pub fn run(global: &GlobalOpts, opts: &NameArg, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    log.debug(&format!("deleting profile \"{}\"", opts.name));
    delete_profile(setup.manager.profiles(), &setup.config.current, &opts.name)?;
    log.info(&format!("deleted profile \"{}\"", opts.name));
    Ok(())
}

/// Delete `name` unless it is missing or is `current`.
///
/// # Errors
///
/// Returns [`ProfileError::NotFound`], [`ProfileError::Active`], or an I/O
/// error from the store.
pub fn delete_profile(
    profiles: &ProfileStore,
    current: &str,
    name: &str,
) -> Result<(), ProfileError> {
    if !profiles.exists(name)? {
        return Err(ProfileError::NotFound(name.to_string()));
    }
    if name == current {
        return Err(ProfileError::Active(name.to_string()));
    }
    profiles.delete(name)
}
