// hermenv: hermetic remote environment
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! ```text
//! --config FILE     ← Additional config files (can repeat)
//! --log-level N     ← Console verbosity (0-5)
//! --log-file FILE   ← Debug log file
//!
//! Precedence: CLI flags > env settings > --config > hermenv.toml > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

use crate::config::loader::ConfigLoader;
use crate::config::DEFAULT_CONFIG_FILE;
use crate::error::Result;
use crate::logging::LogLevel;

/// Global options available for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Path to additional TOML configuration file(s).
    /// Can be specified multiple times.
    #[arg(short = 'c', long = "config", value_name = "FILE", action = clap::ArgAction::Append)]
    pub configs: Vec<PathBuf>,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=5)
    )]
    pub log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl GlobalOptions {
    /// Builds the configuration loader: `hermenv.toml`, then `--config` files,
    /// then `HERMENV__*` settings, then these flags.
    ///
    /// # Errors
    ///
    /// Returns an error if an override cannot be applied.
    pub fn config_loader(&self) -> Result<ConfigLoader> {
        let mut loader = self
            .configs
            .iter()
            .fold(
                ConfigLoader::new().optional_file(DEFAULT_CONFIG_FILE),
                |loader, path| loader.file(path),
            )
            .environment();

        if let Some(level) = self.log_level {
            loader = loader.override_log_level(LogLevel::new(level)?)?;
        }
        if let Some(path) = &self.log_file {
            loader = loader.override_log_file(path)?;
        }
        Ok(loader)
    }
}
