//! Command: remote profile download, listing and repository settings.
use anyhow::{Result, bail};

use super::CommandSetup;
use crate::cli::{GlobalOpts, RemoteAction, RemoteOpts, TokenOpts};
use crate::config::RepoConfig;
use crate::logging::Logger;
use crate::remote::{GitHubSource, RemoteSource, download_profile, mask_token};

/// Run the remote command.
///
/// # Errors
///
/// Returns an error if the workspace is not usable, no profile or action is
/// given, or the remote operation fails.
pub fn run(global: &GlobalOpts, opts: &RemoteOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;

    match &opts.action {
        Some(RemoteAction::Owner(arg)) => {
            setting(&setup, Setting::Owner, arg.value.as_deref(), log)
        }
        Some(RemoteAction::Name(arg)) => setting(&setup, Setting::Name, arg.value.as_deref(), log),
        Some(RemoteAction::Branch(arg)) => {
            setting(&setup, Setting::Branch, arg.value.as_deref(), log)
        }
        Some(RemoteAction::Token(token_opts)) => token(&setup, token_opts, log),
        None if opts.list => list(&GitHubSource::new(setup.config.repo.clone()), log),
        None => {
            let profile = opts.profile.as_deref().unwrap_or_default();
            let source = GitHubSource::new(setup.config.repo.clone());
            download(&setup, &source, profile, log)
        }
    }
}

/// Print every profile published in the remote repository.
///
/// # Errors
///
/// Returns the listing error.
#[allow(clippy::print_stdout)]
pub fn list(source: &dyn RemoteSource, log: &Logger) -> Result<()> {
    let profiles = source.list_profiles()?;
    if profiles.is_empty() {
        log.warn("no remote profiles found");
        return Ok(());
    }
    log.stage("Remote profiles");
    for profile in profiles {
        println!("  {profile}");
    }
    Ok(())
}

/// Download `profile` from `source` into local storage.
///
/// # Errors
///
/// Returns the validation or download error; a partial download is removed.
pub fn download(
    setup: &CommandSetup,
    source: &dyn RemoteSource,
    profile: &str,
    log: &Logger,
) -> Result<()> {
    log.stage(&format!("Downloading \"{profile}\""));
    let counts = download_profile(source, setup.manager.profiles(), profile, log)?;
    log.print_summary();
    log.info(&format!(
        "downloaded profile \"{profile}\" ({} files)",
        counts.synced
    ));
    Ok(())
}

/// A show-or-set repository field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    /// `repo.owner`
    Owner,
    /// `repo.name`
    Name,
    /// `repo.branch`
    Branch,
}

impl Setting {
    const fn key(self) -> &'static str {
        match self {
            Self::Owner => "repo.owner",
            Self::Name => "repo.name",
            Self::Branch => "repo.branch",
        }
    }

    fn get(self, repo: &RepoConfig) -> &str {
        match self {
            Self::Owner => &repo.owner,
            Self::Name => &repo.name,
            Self::Branch => &repo.branch,
        }
    }

    fn field(self, repo: &mut RepoConfig) -> &mut String {
        match self {
            Self::Owner => &mut repo.owner,
            Self::Name => &mut repo.name,
            Self::Branch => &mut repo.branch,
        }
    }
}

/// Print `setting` when `value` is `None`, otherwise persist it.
///
/// # Errors
///
/// Returns an error for a blank value or if the config cannot be written.
#[allow(clippy::print_stdout)]
pub fn setting(
    setup: &CommandSetup,
    setting: Setting,
    value: Option<&str>,
    log: &Logger,
) -> Result<()> {
    let mut config = setup.config.clone();
    let Some(value) = value else {
        println!("{}", setting.get(&config.repo));
        return Ok(());
    };
    if value.trim().is_empty() {
        bail!("{} must not be empty", setting.key());
    }

    *setting.field(&mut config.repo) = value.to_string();
    setup.manager.write(&config)?;
    log.info(&format!("set {} to \"{value}\"", setting.key()));
    Ok(())
}

/// Show the masked token, set it, or remove it.
///
/// # Errors
///
/// Returns an error if the config cannot be written.
#[allow(clippy::print_stdout)]
pub fn token(setup: &CommandSetup, opts: &TokenOpts, log: &Logger) -> Result<()> {
    let mut config = setup.config.clone();
    let stored = setup.config.repo.token.as_deref().filter(|t| !t.is_empty());

    if opts.remove {
        if stored.is_none() {
            log.info("no token is set");
            return Ok(());
        }
        config.repo.token = None;
        setup.manager.write(&config)?;
        log.info("token removed");
        return Ok(());
    }

    match &opts.value {
        None => {
            match stored {
                Some(t) => println!("{}", mask_token(t)),
                None => log.info("no token is set"),
            }
            Ok(())
        }
        Some(value) => {
            config.repo.token = Some(value.clone());
            setup.manager.write(&config)?;
            log.info("token set");
            Ok(())
        }
    }
}
