// hermenv: hermetic remote environment
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Layered settings loader.
//!
//! ```text
//! ConfigLoader::new()
//!   .optional_file("hermenv.toml")     ConfigSource::OptionalFile (if present)
//!   .file(--config ...)                ConfigSource::File
//!   .environment()                     ConfigSource::Environment (HERMENV__*)
//!   .override_log_level(..)            ConfigSource::Override
//!        |
//!        v
//!    build() --> Config (validated)
//! ```
//!
//! Later sources win; overrides always win.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File, FileFormat};

use super::{Config, ENV_PREFIX};
use crate::error::Result;
use crate::logging::LogLevel;

/// One layer that contributed to the final [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// A file that must exist.
    File(PathBuf),
    /// A file that was found on disk; absent optional files are not recorded.
    OptionalFile(PathBuf),
    /// TOML passed as a string.
    Inline,
    /// `HERMENV__SECTION__KEY` variables.
    Environment,
    /// A command-line override of one key.
    Override(&'static str),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) | Self::OptionalFile(path) => write!(f, "{}", path.display()),
            Self::Inline => f.write_str("<inline>"),
            Self::Environment => write!(f, "{ENV_PREFIX}__* variables"),
            Self::Override(key) => write!(f, "--{key}"),
        }
    }
}

/// Collects settings sources in priority order.
pub struct ConfigLoader {
    builder: ConfigBuilder<DefaultState>,
    sources: Vec<ConfigSource>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            sources: Vec::new(),
        }
    }

    /// Adds a TOML file that must exist.
    #[must_use]
    pub fn file(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(path).format(FileFormat::Toml).required(true));
        self.sources.push(ConfigSource::File(path.to_path_buf()));
        self
    }

    /// Adds a TOML file that is skipped when absent.
    #[must_use]
    pub fn optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if path.is_file() {
            self.builder = self
                .builder
                .add_source(File::from(path).format(FileFormat::Toml).required(false));
            self.sources.push(ConfigSource::OptionalFile(path.to_path_buf()));
        }
        self
    }

    #[must_use]
    pub fn inline(mut self, content: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self.sources.push(ConfigSource::Inline);
        self
    }

    /// Reads `HERMENV__SECTION__KEY` settings from the process environment.
    #[must_use]
    pub fn environment(self) -> Self {
        self.environment_source(None)
    }

    /// Reads `HERMENV__SECTION__KEY` settings from `vars` instead of the process.
    #[must_use]
    pub fn environment_from<I, K, V>(self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.environment_source(Some(vars))
    }

    fn environment_source(mut self, vars: Option<HashMap<String, String>>) -> Self {
        self.builder = self.builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("exec.passthrough")
                .try_parsing(true)
                .source(vars.map(|vars| vars.into_iter().collect())),
        );
        self.sources.push(ConfigSource::Environment);
        self
    }

    /// # Errors
    ///
    /// Returns an error if the override cannot be stored.
    pub fn override_log_level(self, level: LogLevel) -> Result<Self> {
        self.set_override("log-level", "global.log_level", i64::from(level.as_u8()))
    }

    /// # Errors
    ///
    /// Returns an error if the override cannot be stored.
    pub fn override_log_file(self, path: &Path) -> Result<Self> {
        self.set_override("log-file", "global.log_file", path.display().to_string())
    }

    fn set_override(
        mut self,
        flag: &'static str,
        key: &str,
        value: impl Into<config::Value>,
    ) -> Result<Self> {
        self.builder = self
            .builder
            .set_override(key, value)
            .with_context(|| format!("invalid override for {key}"))?;
        self.sources.push(ConfigSource::Override(flag));
        Ok(self)
    }

    /// Sources in the order they were layered.
    #[must_use]
    pub fn sources(&self) -> &[ConfigSource] {
        &self.sources
    }

    /// Merges every source and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if a required file is missing, a file is not valid
    /// TOML, the merged settings do not match [`Config`], or validation fails.
    pub fn build(self) -> Result<Config> {
        let origin = self.describe();
        let config: Config = self
            .builder
            .build()
            .and_then(config::Config::try_deserialize)
            .with_context(|| format!("failed to read settings from {origin}"))?;
        config.validate()?;
        Ok(config)
    }

    fn describe(&self) -> String {
        if self.sources.is_empty() {
            return "defaults".to_string();
        }
        self.sources
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
