// hermenv: hermetic remote environment
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `get` and `list` commands.

use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;

use crate::cli::GetArgs;
use crate::env::Environment;
use crate::error::Result;

/// Main handler for get command.
///
/// Prints the value and succeeds, or reports the key as unset and fails.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn run_get_command(args: &GetArgs, env: &dyn Environment) -> Result<ExitCode> {
    let stdout = std::io::stdout();
    if write_value(env, &args.key, &mut stdout.lock())? {
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("hermenv: '{}' is not set", args.key);
        Ok(ExitCode::FAILURE)
    }
}

/// Main handler for list command.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn run_list_command(env: &dyn Environment) -> Result<ExitCode> {
    let stdout = std::io::stdout();
    write_keys(env, &mut stdout.lock())?;
    Ok(ExitCode::SUCCESS)
}

/// Writes the value of `key` followed by a newline; returns false when unset.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn write_value(env: &dyn Environment, key: &str, out: &mut impl Write) -> Result<bool> {
    let Some(value) = env.read(key) else {
        return Ok(false);
    };
    writeln!(out, "{value}").context("failed to write value")?;
    Ok(true)
}

/// Writes every visible key on its own line.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn write_keys(env: &dyn Environment, out: &mut impl Write) -> Result<()> {
    for key in env.enumerate() {
        writeln!(out, "{key}").context("failed to write key")?;
    }
    Ok(())
}
