// hermenv: hermetic remote environment
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The installed namespace.
//!
//! ```text
//! read(k)      preserved ? original[k] : store[k]
//! write(k, v)  preserved ? original[k] = v : WriteRejected
//! contains(k)  preserved ? k in original : k in store
//! enumerate()  store keys (fetch order) ++ preserved keys present in original
//! ```

use std::sync::Arc;

use tracing::debug;

use super::{Environment, OriginalEnv, PRESERVED_KEYS, is_preserved};
use crate::error::WriteRejected;
use crate::store::VariableStore;

/// Hermetic view over the fetched variables and the two bootstrap coordinates.
#[derive(Debug)]
pub struct VirtualEnv {
    store: Arc<VariableStore>,
    original: OriginalEnv,
}

impl VirtualEnv {
    pub fn new(store: impl Into<Arc<VariableStore>>, original: OriginalEnv) -> Self {
        Self {
            store: store.into(),
            original,
        }
    }

    /// The fetched variables.
    #[must_use]
    pub fn store(&self) -> &VariableStore {
        &self.store
    }

    /// The snapshot holding the live bootstrap coordinates.
    #[must_use]
    pub const fn original(&self) -> &OriginalEnv {
        &self.original
    }
}

impl Environment for VirtualEnv {
    fn read(&self, key: &str) -> Option<String> {
        if is_preserved(key) {
            self.original.get(key)
        } else {
            self.store.get(key).map(str::to_owned)
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), WriteRejected> {
        if is_preserved(key) {
            debug!(key, "updating bootstrap coordinate");
            self.original.set(key, value);
            Ok(())
        } else {
            debug!(key, "rejected write to fetched variable");
            Err(WriteRejected {
                key: key.to_owned(),
            })
        }
    }

    fn contains(&self, key: &str) -> bool {
        if is_preserved(key) {
            self.original.contains(key)
        } else {
            self.store.has(key)
        }
    }

    fn enumerate(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.store.keys().map(str::to_owned).collect();
        for key in PRESERVED_KEYS {
            if self.original.contains(key) && !self.store.has(key) {
                keys.push(key.to_owned());
            }
        }
        keys
    }
}
