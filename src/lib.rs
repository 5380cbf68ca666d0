//! Profile switcher for AI-assistant configuration files.
//!
//! A workspace keeps named profiles under `.airc/profiles/`. The files that
//! belong to a profile are selected by the glob rules in `.airc/.sync`, and
//! switching profiles saves the working tree into the current profile,
//! clears it, and restores the target. Profiles can also be downloaded from
//! a GitHub repository.
//!
//! The public API is organised into layers:
//!
//! - **[`sync`]**: rule parsing, glob matching and the save / restore / clear engine
//! - **[`profiles`]**: the profile directory store and name validation
//! - **[`config`]**: `config.json`, the initialisation gate and repair
//! - **[`remote`]**: GitHub listing and downloads
//! - **[`commands`]**: subcommand orchestration
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod operations;
pub mod profiles;
pub mod remote;
pub mod sync;
pub mod workspace;
