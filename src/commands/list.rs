//! Command: list local profiles.
use anyhow::Result;

use super::CommandSetup;
use crate::cli::GlobalOpts;
use crate::logging::Logger;

/// Run the list command.
///
/// # Errors
///
/// Returns an error if the workspace is not usable or the profiles root
/// cannot be read.
#[allow(clippy::print_stdout)]
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let profiles = setup.manager.profiles().list()?;
    log.stage("Local profiles");
    for line in render(&profiles, &setup.config.current) {
        println!("{line}");
    }
    Ok(())
}

/// One line per profile; the current one is starred and highlighted.
fn render(profiles: &[String], current: &str) -> Vec<String> {
    profiles
        .iter()
        .map(|p| {
            if p == current {
                format!("\x1b[32m* {p}\x1b[0m")
            } else {
                format!("  {p}")
            }
        })
        .collect()
}
