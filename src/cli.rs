//! Command-line interface definition.
use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the airc profile switcher.
#[derive(Parser, Debug)]
#[command(
    name = "airc",
    about = "Switch between named AI-assistant configuration profiles",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options every subcommand accepts.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Override the workspace root (defaults to $AIRC_ROOT, then the current directory)
    #[arg(long, global = true)]
    pub root: Option<std::path::PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialise .airc/ in the workspace
    Init(InitOpts),
    /// Create an empty profile
    New(NameArg),
    /// Switch to another profile
    Use(NameArg),
    /// List local profiles
    List,
    /// Delete a profile
    Delete(NameArg),
    /// Rename a profile
    Rename(RenameOpts),
    /// Copy a profile into the working tree without switching to it
    Restore(RestoreOpts),
    /// Remove every file matched by .sync from the working tree
    Clear(ClearOpts),
    /// Download a remote profile or manage the remote repository settings
    Remote(RemoteOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Short name used for the log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Init(_) => "init",
            Self::New(_) => "new",
            Self::Use(_) => "use",
            Self::List => "list",
            Self::Delete(_) => "delete",
            Self::Rename(_) => "rename",
            Self::Restore(_) => "restore",
            Self::Clear(_) => "clear",
            Self::Remote(_) => "remote",
            Self::Version => "version",
        }
    }
}

/// Options for the `init` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct InitOpts {
    /// Repair an existing but broken .airc/
    #[arg(short, long)]
    pub force: bool,
}

/// A single profile name argument.
#[derive(Parser, Debug, Clone)]
pub struct NameArg {
    /// Profile name
    pub name: String,
}

/// Options for the `rename` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct RenameOpts {
    /// Current profile name
    pub old: String,
    /// New profile name
    pub new: String,
}

/// Options for the `restore` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct RestoreOpts {
    /// Profile to restore
    pub profile: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

/// Options for the `clear` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct ClearOpts {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

/// Options for the `remote` subcommand.
#[derive(Parser, Debug, Clone, Default)]
#[command(args_conflicts_with_subcommands = true)]
pub struct RemoteOpts {
    /// Settings action; absent for downloads and `--list`.
    #[command(subcommand)]
    pub action: Option<RemoteAction>,

    /// Remote profile to download
    pub profile: Option<String>,

    /// List remote profiles
    #[arg(short, long)]
    pub list: bool,
}

/// Remote repository settings.
#[derive(Subcommand, Debug, Clone)]
pub enum RemoteAction {
    /// Show or set the repository owner
    Owner(ValueArg),
    /// Show or set the repository name
    Name(ValueArg),
    /// Show or set the branch
    Branch(ValueArg),
    /// Show, set or remove the GitHub token
    Token(TokenOpts),
}

/// Optional value for a show-or-set setting.
#[derive(Parser, Debug, Clone)]
pub struct ValueArg {
    /// New value (omit to show the current one)
    pub value: Option<String>,
}

/// Options for `remote token`.
#[derive(Parser, Debug, Clone)]
pub struct TokenOpts {
    /// New token (omit to show the masked current one)
    pub value: Option<String>,

    /// Remove the stored token
    #[arg(long, conflicts_with = "value")]
    pub remove: bool,
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_init_force() {
        let cli = Cli::parse_from(["airc", "init", "-f"]);
        assert!(matches!(cli.command, Command::Init(InitOpts { force: true })));
    }

    #[test]
    fn parse_use() {
        let cli = Cli::parse_from(["airc", "use", "work"]);
        assert!(
            matches!(&cli.command, Command::Use(_)),
            "Expected Use command"
        );
        if let Command::Use(arg) = cli.command {
            assert_eq!(arg.name, "work");
        }
    }

    #[test]
    fn parse_rename() {
        let cli = Cli::parse_from(["airc", "rename", "old", "new"]);
        if let Command::Rename(opts) = cli.command {
            assert_eq!((opts.old.as_str(), opts.new.as_str()), ("old", "new"));
        } else {
            panic!("Expected Rename command");
        }
    }

    #[test]
    fn parse_restore_force() {
        let cli = Cli::parse_from(["airc", "restore", "work", "--force"]);
        assert!(matches!(cli.command, Command::Restore(RestoreOpts { force: true, .. })));
    }

    #[test]
    fn parse_clear_without_force() {
        let cli = Cli::parse_from(["airc", "clear"]);
        assert!(matches!(cli.command, Command::Clear(ClearOpts { force: false })));
    }

    #[test]
    fn parse_remote_download() {
        let cli = Cli::parse_from(["airc", "remote", "team"]);
        if let Command::Remote(opts) = cli.command {
            assert_eq!(opts.profile.as_deref(), Some("team"));
            assert!(opts.action.is_none());
            assert!(!opts.list);
        } else {
            panic!("Expected Remote command");
        }
    }

    #[test]
    fn parse_remote_list() {
        let cli = Cli::parse_from(["airc", "remote", "--list"]);
        assert!(matches!(cli.command, Command::Remote(RemoteOpts { list: true, .. })));
    }

    #[test]
    fn parse_remote_owner_set_and_show() {
        let cli = Cli::parse_from(["airc", "remote", "owner", "octo"]);
        if let Command::Remote(RemoteOpts {
            action: Some(RemoteAction::Owner(arg)),
            ..
        }) = cli.command
        {
            assert_eq!(arg.value.as_deref(), Some("octo"));
        } else {
            panic!("Expected remote owner");
        }

        let cli = Cli::parse_from(["airc", "remote", "branch"]);
        assert!(matches!(
            cli.command,
            Command::Remote(RemoteOpts {
                action: Some(RemoteAction::Branch(ValueArg { value: None })),
                ..
            })
        ));
    }

    #[test]
    fn parse_remote_token_remove() {
        let cli = Cli::parse_from(["airc", "remote", "token", "--remove"]);
        assert!(matches!(
            cli.command,
            Command::Remote(RemoteOpts {
                action: Some(RemoteAction::Token(TokenOpts { remove: true, value: None })),
                ..
            })
        ));
    }

    #[test]
    fn token_remove_conflicts_with_value() {
        let result = Cli::try_parse_from(["airc", "remote", "token", "abc", "--remove"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_verbose_and_root() {
        let cli = Cli::parse_from(["airc", "-v", "--root", "/tmp/ws", "list"]);
        assert!(cli.verbose);
        assert_eq!(cli.global.root, Some(std::path::PathBuf::from("/tmp/ws")));
        assert_eq!(cli.command.name(), "list");
    }

    #[test]
    fn parse_version() {
        let cli = Cli::parse_from(["airc", "version"]);
        assert!(matches!(cli.command, Command::Version));
    }
}
