// hermenv: hermetic remote environment
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::time::Duration;

use reqwest::StatusCode;

use super::request::{bearer, endpoint, error_message, parse_variables};
use super::{Bootstrap, Coordinates, DEFAULT_TIMEOUT};
use crate::env::{CREDENTIAL_KEY, OriginalEnv, SERVICE_URL_KEY};
use crate::error::{BootstrapError, BootstrapErrorKind};

#[test]
fn test_default_timeout_is_thirty_seconds() {
    assert_eq!(DEFAULT_TIMEOUT, Duration::from_millis(30_000));
}

#[test]
fn test_endpoint_appends_variables() {
    let cases = [
        ("http://localhost:9999", "http://localhost:9999/variables"),
        ("http://localhost:9999/", "http://localhost:9999/variables"),
        ("https://config.example.com/api", "https://config.example.com/api/variables"),
        ("https://config.example.com/api/", "https://config.example.com/api/variables"),
    ];

    for (base, expected) in cases {
        assert_eq!(endpoint(base).unwrap().as_str(), expected, "{base}");
    }
}

#[test]
fn test_endpoint_rejects_malformed_addresses() {
    for address in ["not a url", "localhost:9999", "ftp://files.example.com", "/relative"] {
        let err = endpoint(address).unwrap_err();
        assert_eq!(err.kind(), BootstrapErrorKind::Validation, "{address}");
        assert!(err.to_string().contains(address), "diagnostic names '{address}'");
    }
}

#[test]
fn test_bearer_header_is_sensitive() {
    let value = bearer("k1").unwrap();

    assert_eq!(value.to_str().unwrap(), "Bearer k1");
    assert!(value.is_sensitive());
    assert!(bearer("line\nbreak").is_none());
}

#[test]
fn test_error_message_prefers_error_then_message() {
    let cases = [
        (r#"{"error":"invalid token","message":"ignored"}"#, "invalid token"),
        (r#"{"message":"project not found"}"#, "project not found"),
        (r#"{"detail":"other shape"}"#, r#"{"detail":"other shape"}"#),
        ("upstream exploded", "upstream exploded"),
        (r#"["not","an","object"]"#, r#"["not","an","object"]"#),
    ];

    for (body, expected) in cases {
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, body), expected, "{body}");
    }
}

#[test]
fn test_error_message_empty_body_uses_reason() {
    assert_eq!(error_message(StatusCode::UNAUTHORIZED, ""), "Unauthorized");
}

#[test]
fn test_parse_variables_last_write_wins() {
    let store = parse_variables(
        r#"{"variables":[{"key":"DB_HOST","value":"localhost"},{"key":"DB_HOST","value":"other"}]}"#,
    )
    .unwrap();

    assert_eq!(store.get("DB_HOST"), Some("other"));
    assert_eq!(store.keys().collect::<Vec<_>>(), ["DB_HOST"]);
}

#[test]
fn test_parse_variables_rejects_wrong_shapes() {
    for body in [
        "",
        "{not json",
        r#"{"vars":[]}"#,
        r#"{"variables":[{"key":"A"}]}"#,
        r#"{"variables":[{"key":"A","value":1}]}"#,
    ] {
        assert!(parse_variables(body).is_err(), "{body}");
    }
}

#[test]
fn test_missing_service_url_fails_first() {
    let err = Bootstrap::new(Coordinates::default()).run().unwrap_err();

    assert!(matches!(
        err,
        BootstrapError::MissingServiceUrl { ref key } if key == SERVICE_URL_KEY
    ));
}

#[test]
fn test_missing_credential() {
    let env = OriginalEnv::from_pairs([(SERVICE_URL_KEY, "http://localhost:9999")]);
    let err = Bootstrap::from_env(&env).run().unwrap_err();

    assert!(matches!(
        err,
        BootstrapError::MissingCredential { ref key } if key == CREDENTIAL_KEY
    ));
}

#[test]
fn test_empty_coordinates_count_as_missing() {
    let env = OriginalEnv::from_pairs([(SERVICE_URL_KEY, ""), (CREDENTIAL_KEY, "k")]);
    let err = Bootstrap::from_env(&env).run().unwrap_err();
    assert!(matches!(err, BootstrapError::MissingServiceUrl { .. }));

    let env = OriginalEnv::from_pairs([(SERVICE_URL_KEY, "http://x"), (CREDENTIAL_KEY, "")]);
    let err = Bootstrap::from_env(&env).run().unwrap_err();
    assert!(matches!(err, BootstrapError::MissingCredential { .. }));
}

#[test]
fn test_invalid_address_fails_before_network() {
    let err = Bootstrap::new(Coordinates::new("not a url", "k"))
        .run()
        .unwrap_err();

    assert_eq!(err.kind(), BootstrapErrorKind::Validation);
}

#[test]
fn test_coordinates_debug_hides_credential() {
    let coords = Coordinates::new("http://x", "super-secret");
    let debug = format!("{coords:?}");

    assert!(!debug.contains("super-secret"));
    assert!(debug.contains("http://x"));
}

#[tokio::test]
async fn test_fetch_validates_before_network() {
    let err = Bootstrap::new(Coordinates::new("http://x", ""))
        .fetch()
        .await
        .unwrap_err();

    assert!(matches!(err, BootstrapError::MissingCredential { .. }));
}

#[test]
fn test_unbounded_timeout_still_reports_failure() {
    let result = Bootstrap::new(Coordinates::new("http://127.0.0.1:1", "k"))
        .timeout(Duration::MAX)
        .run();

    let err = result.unwrap_err();
    assert_eq!(err.kind(), BootstrapErrorKind::Network, "{err}");
}
