// hermenv: hermetic remote environment
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the bootstrap fetch using wiremock.
//!
//! Covers:
//! - Request shape (path, bearer credential, content type)
//! - Duplicate keys (last write wins)
//! - Protocol, parse, timeout and connection failures
//! - Failing before any request when a coordinate is missing
//! - Blocking from inside a running tokio runtime

use std::time::Duration;

use hermenv::bootstrap::{Bootstrap, Coordinates};
use hermenv::env::{CREDENTIAL_KEY, OriginalEnv, SERVICE_URL_KEY};
use hermenv::error::{BootstrapError, BootstrapErrorKind};
use hermenv::{Environment, VirtualEnv};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn variables(pairs: &[(&str, &str)]) -> serde_json::Value {
    let list: Vec<_> = pairs
        .iter()
        .map(|(k, v)| json!({ "key": k, "value": v }))
        .collect();
    json!({ "variables": list })
}

async fn serve(response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/variables"))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

// =============================================================================
// Success
// =============================================================================

#[tokio::test]
async fn test_fetch_sends_credential_and_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/variables"))
        .and(header("Authorization", "Bearer k1"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(variables(&[("A", "1")])))
        .expect(1)
        .mount(&server)
        .await;

    let store = Bootstrap::new(Coordinates::new(server.uri(), "k1"))
        .fetch()
        .await
        .unwrap();

    assert_eq!(store.get("A"), Some("1"));
}

#[tokio::test]
async fn test_duplicate_keys_last_write_wins() {
    let server = serve(ResponseTemplate::new(200).set_body_json(variables(&[
        ("DB_HOST", "localhost"),
        ("DB_HOST", "other"),
    ])))
    .await;

    let store = Bootstrap::new(Coordinates::new(server.uri(), "k1"))
        .fetch()
        .await
        .unwrap();
    assert_eq!(store.get("DB_HOST"), Some("other"));

    let env = VirtualEnv::new(store, OriginalEnv::default());
    assert_eq!(env.enumerate(), ["DB_HOST"]);
}

#[tokio::test]
async fn test_base_path_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/variables"))
        .respond_with(ResponseTemplate::new(200).set_body_json(variables(&[("A", "1")])))
        .expect(1)
        .mount(&server)
        .await;

    let address = format!("{}/api/v1/", server.uri());
    let store = Bootstrap::new(Coordinates::new(address, "k1"))
        .fetch()
        .await
        .unwrap();

    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_empty_variable_list() {
    let server = serve(ResponseTemplate::new(200).set_body_json(variables(&[]))).await;

    let store = Bootstrap::new(Coordinates::new(server.uri(), "k1"))
        .fetch()
        .await
        .unwrap();

    assert!(store.is_empty());
}

// =============================================================================
// Blocking synchronizer
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_run_blocks_inside_runtime() {
    let server =
        serve(ResponseTemplate::new(200).set_body_json(variables(&[("A", "1"), ("B", "2")]))).await;

    let store = Bootstrap::new(Coordinates::new(server.uri(), "k1"))
        .run()
        .unwrap();

    assert_eq!(store.keys().collect::<Vec<_>>(), ["A", "B"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_run_from_blocking_thread_with_env_coordinates() {
    let server = serve(
        ResponseTemplate::new(200).set_body_json(variables(&[(SERVICE_URL_KEY, "http://shadow")])),
    )
    .await;

    let snapshot = OriginalEnv::from_pairs([
        (SERVICE_URL_KEY, server.uri()),
        (CREDENTIAL_KEY, "k1".to_string()),
    ]);
    let env = tokio::task::spawn_blocking(move || {
        let store = Bootstrap::from_env(&snapshot).run()?;
        Ok::<_, BootstrapError>(VirtualEnv::new(store, snapshot))
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(env.read(SERVICE_URL_KEY), Some(server.uri()));
    assert_eq!(env.read(CREDENTIAL_KEY).as_deref(), Some("k1"));
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_unauthorized_is_protocol_error() {
    let server =
        serve(ResponseTemplate::new(401).set_body_json(json!({ "error": "invalid token" }))).await;

    let err = Bootstrap::new(Coordinates::new(server.uri(), "bad"))
        .fetch()
        .await
        .unwrap_err();

    assert_eq!(err.kind(), BootstrapErrorKind::Protocol);
    assert_eq!(err.status(), Some(401));
    match err {
        BootstrapError::Protocol { message, url, .. } => {
            assert_eq!(message, "invalid token");
            assert_eq!(url, format!("{}/variables", server.uri()));
        }
        other => panic!("expected protocol error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_surfaces_raw_body() {
    for (status, body, expected) in [
        (500, "database unavailable", "database unavailable"),
        (403, r#"{"message":"forbidden project"}"#, "forbidden project"),
        (404, "", "Not Found"),
    ] {
        let server = serve(ResponseTemplate::new(status).set_body_string(body)).await;

        let err = Bootstrap::new(Coordinates::new(server.uri(), "k1"))
            .fetch()
            .await
            .unwrap_err();

        match err {
            BootstrapError::Protocol {
                status: actual,
                message,
                ..
            } => {
                assert_eq!(actual, status);
                assert_eq!(message, expected);
            }
            other => panic!("expected protocol error for {status}, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_non_200_success_status_is_protocol_error() {
    let server = serve(ResponseTemplate::new(204)).await;

    let err = Bootstrap::new(Coordinates::new(server.uri(), "k1"))
        .fetch()
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(204));
}

#[tokio::test]
async fn test_malformed_json_is_parse_error() {
    let server = serve(ResponseTemplate::new(200).set_body_string("{\"variables\": [")).await;

    let err = Bootstrap::new(Coordinates::new(server.uri(), "k1"))
        .fetch()
        .await
        .unwrap_err();

    assert_eq!(err.kind(), BootstrapErrorKind::Parse);
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_missing_credential_sends_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(variables(&[])))
        .expect(0)
        .mount(&server)
        .await;

    let snapshot = OriginalEnv::from_pairs([(SERVICE_URL_KEY, server.uri())]);
    let err = Bootstrap::from_env(&snapshot).fetch().await.unwrap_err();

    assert!(matches!(err, BootstrapError::MissingCredential { .. }));
}

#[tokio::test]
async fn test_timeout() {
    let server = serve(
        ResponseTemplate::new(200)
            .set_body_json(variables(&[("A", "1")]))
            .set_delay(Duration::from_secs(5)),
    )
    .await;

    let err = Bootstrap::new(Coordinates::new(server.uri(), "k1"))
        .timeout(Duration::from_millis(200))
        .fetch()
        .await
        .unwrap_err();

    assert!(
        matches!(err, BootstrapError::Timeout { timeout_ms: 200, .. }),
        "{err:?}"
    );
    assert_eq!(err.kind(), BootstrapErrorKind::Network);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_run_timeout() {
    let server = serve(
        ResponseTemplate::new(200)
            .set_body_json(variables(&[("A", "1")]))
            .set_delay(Duration::from_secs(5)),
    )
    .await;

    let err = Bootstrap::new(Coordinates::new(server.uri(), "k1"))
        .timeout(Duration::from_millis(200))
        .run()
        .unwrap_err();

    assert!(matches!(err, BootstrapError::Timeout { .. }), "{err:?}");
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let address = format!("http://127.0.0.1:{port}");
    let err = Bootstrap::new(Coordinates::new(&address, "k1"))
        .fetch()
        .await
        .unwrap_err();

    assert_eq!(err.kind(), BootstrapErrorKind::Network);
    assert!(err.to_string().contains(&address), "{err}");
}
