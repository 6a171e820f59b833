// hermenv: hermetic remote environment
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Snapshot of the process environment taken before bootstrap.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Copy of the OS-level variables as they were at process start.
///
/// After installation only the bootstrap coordinates are written through
/// this snapshot; the real process environment is never touched.
#[derive(Debug, Default)]
pub struct OriginalEnv {
    vars: RwLock<HashMap<String, String>>,
}

impl OriginalEnv {
    /// Captures the current process environment.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    #[must_use]
    pub fn capture() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self {
            vars: RwLock::new(vars),
        }
    }

    /// Creates a snapshot from explicit pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            vars: RwLock::new(vars),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.vars
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// True when `key` is set, even to an empty string.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.vars
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    pub(crate) fn set(&self, key: &str, value: &str) {
        self.vars
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
    }

    /// Returns a non-empty value, treating empty strings as unset.
    #[must_use]
    pub fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| !v.is_empty())
    }
}
