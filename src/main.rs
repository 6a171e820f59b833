// hermenv: hermetic remote environment
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> try_install() --> Command Dispatch
//!                                          (exit 1)          Exec | Get | List
//! ```

use std::process::ExitCode;

use hermenv::VirtualEnv;
use hermenv::cli::{self, Command};
use hermenv::cmd::exec::run_exec_command;
use hermenv::cmd::query::{run_get_command, run_list_command};
use hermenv::config::{Config, GlobalConfig};
use hermenv::logging::{LogConfig, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let config = match cli.global.config_loader().and_then(|loader| loader.build()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("hermenv: failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let log_config = build_log_config(&config.global);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("hermenv: failed to initialize logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, &config).await
}

fn build_log_config(global: &GlobalConfig) -> LogConfig {
    LogConfig::builder()
        .with_console_level(global.log_level)
        .maybe_with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
        .build()
}

async fn dispatch_command(cli: &cli::Cli, config: &Config) -> ExitCode {
    if matches!(cli.command, Command::Version) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let Some(env) = install_environment().await else {
        return ExitCode::FAILURE;
    };

    let result = match &cli.command {
        Command::Exec(args) => run_exec_command(args, env, env.original(), &config.exec).await,
        Command::Get(args) => run_get_command(args, env),
        Command::List => run_list_command(env),
        Command::Version => Ok(ExitCode::SUCCESS),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("hermenv: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Runs the blocking bootstrap off the async executor.
///
/// Failures are reported here rather than through [`hermenv::install`] so the
/// log guard in `main` is dropped and flushed before the process exits.
async fn install_environment() -> Option<&'static VirtualEnv> {
    match tokio::task::spawn_blocking(hermenv::try_install).await {
        Ok(Ok(env)) => Some(env),
        Ok(Err(e)) => {
            eprintln!("hermenv: {e}");
            None
        }
        Err(e) => {
            eprintln!("hermenv: bootstrap task failed: {e}");
            None
        }
    }
}
