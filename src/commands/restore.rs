//! Command: copy a profile into the working tree without switching.
use anyhow::Result;

use super::{CommandSetup, confirm};
use crate::cli::{GlobalOpts, RestoreOpts};
use crate::error::SyncError;
use crate::logging::Logger;

/// Run the restore command.
///
/// The active profile is left as it is and the working tree is not saved
/// first; overwritten files go to the stash.
///
/// # Errors
///
/// Returns an error if the workspace is not usable, the profile does not
/// exist, or the rule file cannot be read.
pub fn run(global: &GlobalOpts, opts: &RestoreOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let name = opts.profile.as_str();

    if !setup.manager.profiles().exists(name)? {
        return Err(SyncError::ProfileNotFound {
            name: name.to_string(),
        }
        .into());
    }

    if !opts.force {
        log.warn(&format!(
            "the contents of \"{name}\" will be written into the working tree; \
             current changes are not saved to any profile"
        ));
        if !confirm("Continue?")? {
            log.info("cancelled");
            return Ok(());
        }
    }

    log.stage(&format!("Restoring \"{name}\""));
    let report = setup.engine(log).restore_from_profile(name)?;
    for stash in report.stashed() {
        log.info(&format!("previous content kept at {}", stash.display()));
    }

    log.print_summary();
    log.info(&format!("restored profile \"{name}\""));
    Ok(())
}
