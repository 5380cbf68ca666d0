//! Command: create an empty profile.
use anyhow::Result;

use super::CommandSetup;
use crate::cli::{GlobalOpts, NameArg};
use crate::error::ProfileError;
use crate::logging::Logger;
use crate::profiles::{ProfileStore, validate_name};

/// Run the new command.
///
/// # Errors
///
/// Returns an error if the workspace is not usable, the name is invalid, or
/// the profile already exists.
pub fn run(global: &GlobalOpts, opts: &NameArg, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    create_profile(setup.manager.profiles(), &opts.name)?;
    log.info(&format!("created profile \"{}\"", opts.name));
    Ok(())
}

/// Validate `name` and create it as an empty profile.
///
/// # Errors
///
/// Returns [`ProfileError::InvalidName`] or [`ProfileError::AlreadyExists`],
/// or an I/O error from the store.
pub fn create_profile(profiles: &ProfileStore, name: &str) -> Result<(), ProfileError> {
    validate_name(name)?;
    if profiles.exists(name)? {
        return Err(ProfileError::AlreadyExists(name.to_string()));
    }
    profiles.create(name)
}
