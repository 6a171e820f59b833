// hermenv: hermetic remote environment
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The `/variables` request and response classification.
//!
//! ```text
//! GET {base}/variables
//!   Authorization: Bearer <credential>   (sensitive)
//!   Content-Type: application/json
//!        |
//!        +-- send error / body error --> Request | Timeout
//!        +-- status != 200 -----------> Protocol { status, error|message|body }
//!        +-- 200, bad JSON -----------> Parse
//!        +-- 200 ---------------------> VariableStore
//! ```

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, trace};
use url::Url;

use crate::error::BootstrapError;
use crate::store::{RawVariable, VariableStore};

/// Path segment appended to the service base address.
const VARIABLES_SEGMENT: &str = "variables";

/// Successful response body.
#[derive(Debug, Deserialize)]
struct VariablesResponse {
    variables: Vec<RawVariable>,
}

/// A validated request: endpoint URL plus the authorization header.
#[derive(Clone)]
pub(super) struct Target {
    url: Url,
    authorization: HeaderValue,
}

impl std::fmt::Debug for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Target")
            .field("url", &self.url.as_str())
            .field("authorization", &"[hidden]")
            .finish()
    }
}

impl Target {
    pub(super) fn new(url: Url, authorization: HeaderValue) -> Self {
        Self { url, authorization }
    }

    pub(super) const fn url(&self) -> &Url {
        &self.url
    }
}

/// Resolves `{base}/variables`, keeping any path prefix on the base.
pub(super) fn endpoint(address: &str) -> Result<Url, BootstrapError> {
    let invalid = |message: String| BootstrapError::InvalidServiceUrl {
        address: address.to_owned(),
        message,
    };

    let mut url = Url::parse(address).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!(
            "unsupported scheme '{}', expected http or https",
            url.scheme()
        )));
    }

    url.path_segments_mut()
        .map_err(|()| invalid("URL cannot be used as a base".to_string()))?
        .pop_if_empty()
        .push(VARIABLES_SEGMENT);
    Ok(url)
}

/// Builds the `Authorization: Bearer` header value, hidden from debug output.
pub(super) fn bearer(credential: &str) -> Option<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {credential}")).ok()?;
    value.set_sensitive(true);
    Some(value)
}

/// Performs the request once. No retries.
pub(super) async fn fetch_variables(
    target: &Target,
    timeout: Duration,
) -> Result<VariableStore, BootstrapError> {
    let url = target.url.as_str();

    let client = Client::builder()
        .user_agent(format!("hermenv/{}", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .map_err(|e| BootstrapError::Worker {
            message: format!("failed to build HTTP client: {}", error_chain(&e)),
        })?;

    debug!(url, timeout_ms = millis(timeout), "fetching variables");

    let response = client
        .get(target.url.clone())
        .header(AUTHORIZATION, target.authorization.clone())
        .header(CONTENT_TYPE, "application/json")
        .send()
        .await
        .map_err(|e| request_error(&e, url, timeout))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| request_error(&e, url, timeout))?;
    trace!(url, status = status.as_u16(), bytes = body.len(), "response received");

    if status != StatusCode::OK {
        return Err(BootstrapError::Protocol {
            url: url.to_owned(),
            status: status.as_u16(),
            message: error_message(status, &body),
        });
    }

    let store = parse_variables(&body).map_err(|e| BootstrapError::Parse {
        url: url.to_owned(),
        message: e.to_string(),
    })?;
    debug!(url, count = store.len(), "variables fetched");
    Ok(store)
}

/// Parses a 200 body into a store.
pub(super) fn parse_variables(body: &str) -> Result<VariableStore, serde_json::Error> {
    let response: VariablesResponse = serde_json::from_str(body)?;
    Ok(VariableStore::from_raw(response.variables))
}

/// Extracts the server's explanation from a non-200 body.
///
/// Prefers a string `error` field, then `message`, then the raw body. An
/// empty body falls back to the status reason phrase.
pub(super) fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(serde_json::Value::Object(fields)) = serde_json::from_str(body) {
        let field = ["error", "message"]
            .iter()
            .find_map(|name| fields.get(*name).and_then(serde_json::Value::as_str));
        if let Some(text) = field {
            return text.to_owned();
        }
    }

    if body.trim().is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("empty response body")
            .to_owned();
    }
    body.to_owned()
}

fn request_error(err: &reqwest::Error, url: &str, timeout: Duration) -> BootstrapError {
    if err.is_timeout() {
        BootstrapError::Timeout {
            url: url.to_owned(),
            timeout_ms: millis(timeout),
        }
    } else {
        BootstrapError::Request {
            url: url.to_owned(),
            message: error_chain(err),
        }
    }
}

/// Flattens an error and its sources into one line.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

pub(super) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
