// hermenv: hermetic remote environment
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Immutable variable store built from the service response.
//!
//! ```text
//! [RawVariable] (wire order, duplicates allowed)
//!        |
//!        v
//! VariableStore
//!   values: HashMap<key, value>   O(1) lookup, last write wins
//!   order:  Vec<key>              first-seen position per key
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// A single `{key, value}` pair as sent by the configuration service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawVariable {
    pub key: String,
    pub value: String,
}

impl RawVariable {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Fetched variables, frozen after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableStore {
    values: HashMap<String, String>,
    order: Vec<String>,
}

impl VariableStore {
    /// Builds a store from variables in wire order.
    ///
    /// A repeated key takes the value of its last occurrence and keeps the
    /// position of its first.
    pub fn from_raw<I>(variables: I) -> Self
    where
        I: IntoIterator<Item = RawVariable>,
    {
        let mut values = HashMap::new();
        let mut order = Vec::new();

        for RawVariable { key, value } in variables {
            match values.entry(key) {
                Entry::Occupied(mut slot) => {
                    slot.insert(value);
                }
                Entry::Vacant(slot) => {
                    order.push(slot.key().clone());
                    slot.insert(value);
                }
            }
        }

        Self { values, order }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Stored keys in fetch order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Key/value pairs in fetch order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order
            .iter()
            .filter_map(|key| self.values.get(key).map(|v| (key.as_str(), v.as_str())))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl FromIterator<RawVariable> for VariableStore {
    fn from_iter<T: IntoIterator<Item = RawVariable>>(iter: T) -> Self {
        Self::from_raw(iter)
    }
}

#[cfg(test)]
mod tests;
