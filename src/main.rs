//! `airc` binary entry point.
use anyhow::Result;
use clap::Parser;

use airc_cli::cli::{Cli, Command};
use airc_cli::commands;
use airc_cli::logging::{self, Logger};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    logging::init_subscriber(args.verbose, args.command.name());

    ctrlc::set_handler(|| {
        tracing::warn!("interrupted");
        std::process::exit(130);
    })?;

    let log = Logger::new(args.command.name());
    let global = &args.global;

    match &args.command {
        Command::Init(opts) => commands::init::run(global, opts, &log),
        Command::New(opts) => commands::new::run(global, opts, &log),
        Command::Use(opts) => commands::switch::run(global, opts, &log),
        Command::List => commands::list::run(global, &log),
        Command::Delete(opts) => commands::delete::run(global, opts, &log),
        Command::Rename(opts) => commands::rename::run(global, opts, &log),
        Command::Restore(opts) => commands::restore::run(global, opts, &log),
        Command::Clear(opts) => commands::clear::run(global, opts, &log),
        Command::Remote(opts) => commands::remote::run(global, opts, &log),
        Command::Version => {
            commands::version::run();
            Ok(())
        }
    }
}
