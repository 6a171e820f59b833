// hermenv: hermetic remote environment
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Settings for the `hermenv` tool itself.
//!
//! These never feed the hermetic namespace; they only shape logging and how
//! child processes are launched.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. hermenv.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. HERMENV__SECTION__KEY env vars
//! 5. CLI overrides
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! HERMENV__GLOBAL__LOG_LEVEL=4       → global.log_level = 4
//! HERMENV__EXEC__PASSTHROUGH=PATH,TZ → exec.passthrough = ["PATH", "TZ"]
//! ```
//!
//! The double underscore keeps `HERMENV_SERVICE_URL` and
//! `HERMENV_SERVICE_TOKEN` out of the settings namespace.

pub mod loader;


use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::env::is_preserved;
use crate::error::{ConfigError, Result};
use crate::logging::LogLevel;

use loader::ConfigLoader;

/// Default settings file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "hermenv.toml";

/// Prefix for settings taken from the environment.
pub const ENV_PREFIX: &str = "HERMENV";

/// Complete tool configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub global: GlobalConfig,
    pub exec: ExecConfig,
}

/// Logging options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Console verbosity (0-5).
    pub log_level: LogLevel,
    /// Optional log file, written at debug level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

/// Options for `hermenv exec`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecConfig {
    /// OS variables copied into the child in addition to the hermetic set,
    /// e.g. `PATH` so the program can be found. Fetched variables win.
    pub passthrough: Vec<String>,
}

impl Config {
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().inline(content).build()
    }

    /// Checks values the type system cannot.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an empty passthrough name, a
    /// name containing `=`, or one of the bootstrap coordinates.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        for name in &self.exec.passthrough {
            let problem = if name.is_empty() {
                Some("variable names cannot be empty".to_string())
            } else if name.contains('=') {
                Some(format!("'{name}' is not a variable name"))
            } else if is_preserved(name) {
                Some(format!("'{name}' is always passed to the child"))
            } else {
                None
            };

            if let Some(message) = problem {
                return Err(ConfigError::InvalidValue {
                    section: "exec".to_string(),
                    key: "passthrough".to_string(),
                    message,
                });
            }
        }
        Ok(())
    }
}
