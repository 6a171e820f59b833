// hermenv: hermetic remote environment
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Hermetic environment namespace.
//!
//! # Architecture
//!
//! ```text
//!                 Environment (trait)
//!                        |
//!                   VirtualEnv
//!                  /          \
//!   HERMENV_SERVICE_URL     any other key
//!   HERMENV_SERVICE_TOKEN        |
//!          |                     v
//!          v              VariableStore (Arc, frozen)
//!   OriginalEnv (RwLock, live)
//! ```
//!
//! - **Hermetic**: OS variables other than the two coordinates are never visible
//! - **Read-only**: fetched variables reject writes
//! - **Live coordinates**: the two coordinates stay readable and writable

pub mod snapshot;
pub mod virtual_env;


pub use snapshot::OriginalEnv;
pub use virtual_env::VirtualEnv;

use crate::error::WriteRejected;

/// OS variable holding the configuration service base URL.
pub const SERVICE_URL_KEY: &str = "HERMENV_SERVICE_URL";

/// OS variable holding the bearer credential for the configuration service.
pub const CREDENTIAL_KEY: &str = "HERMENV_SERVICE_TOKEN";

/// Keys that bypass hermetic filtering and resolve against the original environment.
pub const PRESERVED_KEYS: [&str; 2] = [SERVICE_URL_KEY, CREDENTIAL_KEY];

/// Returns true for the two bootstrap coordinates.
#[must_use]
pub fn is_preserved(key: &str) -> bool {
    PRESERVED_KEYS.contains(&key)
}

/// Property-style description of a visible key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub value: String,
    pub enumerable: bool,
    pub configurable: bool,
    /// Only the bootstrap coordinates accept writes.
    pub writable: bool,
}

/// Key/value namespace that consuming code reads configuration from.
///
/// Consumers take `&dyn Environment` (or `impl Environment`) instead of
/// calling `std::env` so the hermetic view can be injected.
///
/// # Thread Safety
///
/// Does **not** require `Send + Sync`; add the bounds at the call site.
pub trait Environment {
    /// Current value of `key`, or `None` when it is not provisioned.
    fn read(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key` if the key accepts writes.
    ///
    /// # Errors
    ///
    /// Returns [`WriteRejected`] when the key is read-only; nothing changes in that case.
    fn write(&self, key: &str, value: &str) -> Result<(), WriteRejected>;

    fn contains(&self, key: &str) -> bool;

    /// Visible keys, each listed once.
    fn enumerate(&self) -> Vec<String>;

    fn describe(&self, key: &str) -> Option<Descriptor> {
        if !self.contains(key) {
            return None;
        }
        self.read(key).map(|value| Descriptor {
            value,
            enumerable: true,
            configurable: true,
            writable: is_preserved(key),
        })
    }

    /// Drop-in for [`std::env::var`].
    ///
    /// # Errors
    ///
    /// Returns [`std::env::VarError::NotPresent`] when the key is not visible.
    fn var(&self, key: &str) -> Result<String, std::env::VarError> {
        self.read(key).ok_or(std::env::VarError::NotPresent)
    }

    /// Visible key/value pairs in enumeration order.
    fn vars(&self) -> Vec<(String, String)> {
        self.enumerate()
            .into_iter()
            .filter_map(|key| self.read(&key).map(|value| (key, value)))
            .collect()
    }
}
