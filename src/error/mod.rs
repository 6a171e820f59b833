// hermenv: hermetic remote environment
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!            HermenvError (~24 bytes)
//!                     |
//!   +--------+--------+--------+------+------+
//!   |        |        |        |      |      |
//!   v        v        v        v      v      v
//! Bail  Bootstrap  Config  Process   Io   Other
//!         Box       Box      Box     Box  Box<str>
//!
//! BootstrapError kinds:
//!   Configuration  MissingServiceUrl, MissingCredential
//!   Validation     InvalidServiceUrl, InvalidCredential
//!   Network        Request, Timeout, Worker
//!   Protocol       Protocol (non-200)
//!   Parse          Parse (malformed 200 body)
//!
//! Post-install lookups never fail; only writes to
//! fetched keys are rejected (WriteRejected).
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`HermenvError`].
pub type HermenvResult<T> = std::result::Result<T, HermenvError>;

/// Top-level error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum HermenvError {
    /// Fatal error that should terminate the application.
    #[error("fatal error: {0}")]
    Bailed(Box<str>),

    /// Bootstrap fetch failed.
    #[error("bootstrap failed: {0}")]
    Bootstrap(#[from] Box<BootstrapError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Child process error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

impl HermenvError {
    /// Returns the bootstrap error if this is one.
    #[must_use]
    pub fn as_bootstrap(&self) -> Option<&BootstrapError> {
        match self {
            Self::Bootstrap(err) => Some(err),
            _ => None,
        }
    }
}

/// Create a fatal [`HermenvError::Bailed`] that terminates the application.
pub fn bail_out(message: impl Into<String>) -> HermenvError {
    HermenvError::Bailed(message.into().into_boxed_str())
}

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for HermenvError {
                fn from(err: $error) -> Self {
                    HermenvError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    BootstrapError => Bootstrap,
    ConfigError => Config,
    ProcessError => Process,
    std::io::Error => Io,
}

// --- Bootstrap Errors ---

/// Category of a [`BootstrapError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BootstrapErrorKind {
    /// A bootstrap coordinate is missing from the environment.
    Configuration,
    /// A bootstrap coordinate is present but malformed.
    Validation,
    /// Connection failure, timeout or a lost fetch worker.
    Network,
    /// The service answered with a non-200 status.
    Protocol,
    /// The service answered 200 with a body that is not a variable list.
    Parse,
}

impl std::fmt::Display for BootstrapErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Configuration => "configuration",
            Self::Validation => "validation",
            Self::Network => "network",
            Self::Protocol => "protocol",
            Self::Parse => "parse",
        };
        f.write_str(name)
    }
}

/// Errors raised while fetching the variable set.
///
/// Every variant is fatal; the bootstrap is never retried.
#[derive(Debug, Clone, Error)]
pub enum BootstrapError {
    /// The service address coordinate is unset or empty.
    #[error("missing service address: set {key} to the configuration service URL")]
    MissingServiceUrl { key: String },

    /// The credential coordinate is unset or empty.
    #[error("missing credential: set {key} to the configuration service token")]
    MissingCredential { key: String },

    /// The service address is not a usable http(s) URL.
    #[error("invalid service address '{address}': {message}")]
    InvalidServiceUrl { address: String, message: String },

    /// The credential cannot be carried in an HTTP header.
    #[error("invalid credential in {key}: contains characters not allowed in an HTTP header")]
    InvalidCredential { key: String },

    /// The request could not be sent or the response could not be read.
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// The request did not complete before the deadline.
    #[error("request to {url} timed out after {timeout_ms} ms")]
    Timeout { url: String, timeout_ms: u64 },

    /// The fetch worker could not start or exited without a result.
    #[error("fetch worker failed: {message}")]
    Worker { message: String },

    /// The service returned a non-200 status.
    #[error("{url} returned HTTP {status}: {message}")]
    Protocol {
        url: String,
        status: u16,
        message: String,
    },

    /// The service returned 200 but the body is not a variable list.
    #[error("could not parse response from {url}: {message}")]
    Parse { url: String, message: String },
}

impl BootstrapError {
    /// Returns the category of this error.
    #[must_use]
    pub const fn kind(&self) -> BootstrapErrorKind {
        match self {
            Self::MissingServiceUrl { .. } | Self::MissingCredential { .. } => {
                BootstrapErrorKind::Configuration
            }
            Self::InvalidServiceUrl { .. } | Self::InvalidCredential { .. } => {
                BootstrapErrorKind::Validation
            }
            Self::Request { .. } | Self::Timeout { .. } | Self::Worker { .. } => {
                BootstrapErrorKind::Network
            }
            Self::Protocol { .. } => BootstrapErrorKind::Protocol,
            Self::Parse { .. } => BootstrapErrorKind::Parse,
        }
    }

    /// HTTP status carried by a protocol failure.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Protocol { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration.
    #[error("failed to parse config '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Process Errors ---

/// Child process errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed while waiting for the process.
    #[error("failed to wait for process '{command}': {source}")]
    WaitFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

// --- Namespace Errors ---

/// A write to a key that is not a bootstrap coordinate.
///
/// Fetched variables are read-only; the rejected write leaves the namespace untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{key}' is read-only in the hermetic environment")]
pub struct WriteRejected {
    pub key: String,
}
