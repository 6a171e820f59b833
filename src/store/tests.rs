// hermenv: hermetic remote environment
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{RawVariable, VariableStore};

fn store(pairs: &[(&str, &str)]) -> VariableStore {
    pairs.iter().map(|(k, v)| RawVariable::new(*k, *v)).collect()
}

#[test]
fn test_lookup() {
    let store = store(&[("DB_HOST", "localhost"), ("DB_PORT", "5432")]);

    assert_eq!(store.get("DB_HOST"), Some("localhost"));
    assert_eq!(store.get("DB_PORT"), Some("5432"));
    assert_eq!(store.get("db_host"), None, "lookup is exact-match");
    assert!(store.has("DB_PORT"));
    assert!(!store.has("MISSING"));
}

#[test]
fn test_duplicate_keys_last_write_wins() {
    let store = store(&[
        ("DB_HOST", "localhost"),
        ("API_KEY", "abc"),
        ("DB_HOST", "other"),
    ]);

    assert_eq!(store.get("DB_HOST"), Some("other"));
    assert_eq!(store.len(), 2);
    assert_eq!(store.keys().collect::<Vec<_>>(), ["DB_HOST", "API_KEY"]);
}

#[test]
fn test_keys_keep_fetch_order() {
    let store = store(&[("ZETA", "1"), ("ALPHA", "2"), ("MID", "3")]);

    assert_eq!(store.keys().collect::<Vec<_>>(), ["ZETA", "ALPHA", "MID"]);
    assert_eq!(
        store.iter().collect::<Vec<_>>(),
        [("ZETA", "1"), ("ALPHA", "2"), ("MID", "3")]
    );
}

#[test]
fn test_empty_values_are_present() {
    let store = store(&[("EMPTY", "")]);

    assert!(store.has("EMPTY"));
    assert_eq!(store.get("EMPTY"), Some(""));
}

#[test]
fn test_empty_store() {
    let store = VariableStore::default();

    assert!(store.is_empty());
    assert_eq!(store.keys().count(), 0);
}

#[test]
fn test_raw_variable_wire_shape() {
    let parsed: Vec<RawVariable> =
        serde_json::from_str(r#"[{"key":"A","value":"1"},{"key":"A","value":"2"}]"#).unwrap();

    assert_eq!(
        parsed,
        vec![RawVariable::new("A", "1"), RawVariable::new("A", "2")]
    );
}
