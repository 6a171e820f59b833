// hermenv: hermetic remote environment
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! hermenv [global options] <command>
//! exec -- <program> [args...]
//! get <KEY>
//! list
//! version
//! ```

pub mod global;


use std::ffi::OsString;

use crate::cli::global::GlobalOptions;
use clap::{Args, Parser, Subcommand};

/// Hermetic process environment backed by a remote configuration service.
#[derive(Debug, Parser)]
#[command(
    name = "hermenv",
    author,
    version,
    about = "Run programs against a hermetic, remotely provisioned environment",
    long_about = "hermenv fetches the variable set for this process from the configuration\n\
                  service named by HERMENV_SERVICE_URL, authenticating with the bearer\n\
                  token in HERMENV_SERVICE_TOKEN. Only the fetched variables and those two\n\
                  coordinates are visible; nothing else leaks in from the surrounding\n\
                  environment.",
    after_help = "CONFIG FILES:\n\n\
                  hermenv reads hermenv.toml from the current directory if present,\n\
                  then every file passed with --config. Settings can also be given as\n\
                  HERMENV__<SECTION>__<KEY> environment variables."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    Version,

    /// Runs a program with only the provisioned variables in its environment.
    Exec(ExecArgs),

    /// Prints the value of one variable.
    Get(GetArgs),

    /// Lists the visible variable names.
    List,
}

/// Arguments for `exec`.
#[derive(Debug, Clone, Args)]
pub struct ExecArgs {
    /// Program to run, followed by its arguments.
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND"
    )]
    pub command: Vec<OsString>,
}

/// Arguments for `get`.
#[derive(Debug, Clone, Args)]
pub struct GetArgs {
    /// Variable name.
    pub key: String,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse_from<I, T>(iter: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(iter)
}
