//! Command: remove synchronised files from the working tree.
use anyhow::{Context as _, Result};

use super::{CommandSetup, confirm};
use crate::cli::{ClearOpts, GlobalOpts};
use crate::logging::Logger;

/// Run the clear command.
///
/// # Errors
///
/// Returns an error if the workspace is not usable, the rule file cannot be
/// read, or the confirmation prompt fails.
pub fn run(global: &GlobalOpts, opts: &ClearOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let rules = setup.manager.rules();
    let patterns = rules
        .read_patterns()
        .with_context(|| format!("reading {}", rules.path().display()))?;
    let engine = setup.engine(log);

    let matched = engine.matched_files(&patterns);
    if matched.is_empty() {
        log.info("no files to clear");
        return Ok(());
    }

    if !opts.force && !confirm(&format!("Delete {} files matched by .sync?", matched.len()))? {
        log.info("cancelled");
        return Ok(());
    }

    let report = engine.clear_files(&patterns);
    log.print_summary();
    log.info(&format!("cleared {} files", report.synced_paths().len()));
    Ok(())
}
