// hermenv: hermetic remote environment
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Exec command: run a child with a hermetic environment.
//!
//! ```text
//! env_clear()
//!   + passthrough names from the original snapshot (e.g. PATH)
//!   + VirtualEnv::vars()  (fetched variables win, then coordinates)
//!        |
//!        v
//!   spawn, inherit stdio, wait --> child's exit code
//! ```

use std::ffi::OsString;
use std::process::{ExitCode, ExitStatus};

use anyhow::anyhow;
use tokio::process::Command;
use tracing::{debug, info};

use crate::cli::ExecArgs;
use crate::config::ExecConfig;
use crate::env::{Environment, OriginalEnv};
use crate::error::{ProcessError, Result};

/// Builds the complete child environment.
///
/// `passthrough` names are looked up in `original`; everything visible
/// through `env` is layered on top.
#[must_use]
pub fn child_environment(
    env: &dyn Environment,
    original: &OriginalEnv,
    passthrough: &[String],
) -> Vec<(String, String)> {
    let mut vars: Vec<(String, String)> = passthrough
        .iter()
        .filter(|name| !env.contains(name))
        .filter_map(|name| original.get(name).map(|value| (name.clone(), value)))
        .collect();
    vars.extend(env.vars());
    vars
}

/// Main handler for exec command.
///
/// # Errors
///
/// Returns an error if no program is given or the child cannot be spawned
/// or waited on.
pub async fn run_exec_command(
    args: &ExecArgs,
    env: &dyn Environment,
    original: &OriginalEnv,
    config: &ExecConfig,
) -> Result<ExitCode> {
    let (program, rest) = args
        .command
        .split_first()
        .ok_or_else(|| anyhow!("no program given"))?;
    let program_name = program.to_string_lossy().into_owned();

    let vars = child_environment(env, original, &config.passthrough);
    debug!(command = %command_line(&args.command), vars = vars.len(), "spawning hermetic child");

    let mut child = Command::new(program)
        .args(rest)
        .env_clear()
        .envs(vars)
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ProcessError::SpawnFailed {
            command: program_name.clone(),
            source,
        })?;

    let status = child
        .wait()
        .await
        .map_err(|source| ProcessError::WaitFailed {
            command: program_name.clone(),
            source,
        })?;

    info!(program = %program_name, status = %status, "child exited");
    Ok(exit_code(status))
}

/// Maps a child status to our own exit code.
fn exit_code(status: ExitStatus) -> ExitCode {
    match status.code() {
        Some(0) => ExitCode::SUCCESS,
        Some(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        None => ExitCode::FAILURE,
    }
}

/// Renders the command line for logging.
fn command_line(args: &[OsString]) -> String {
    args.iter()
        .map(|arg| {
            let arg = arg.to_string_lossy();
            if arg.contains(' ') {
                format!("\"{arg}\"")
            } else {
                arg.into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
