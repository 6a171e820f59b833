// hermenv: hermetic remote environment
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! One-time bootstrap fetch.
//!
//! ```text
//! Bootstrap::from_env(&OriginalEnv)
//!   .timeout()                          (default 30 s)
//!        |
//!        v
//!   resolve()   no network yet
//!     HERMENV_SERVICE_URL   unset/empty -> MissingServiceUrl
//!     HERMENV_SERVICE_TOKEN unset/empty -> MissingCredential
//!     address not http(s) URL          -> InvalidServiceUrl
//!        |
//!        +-----------------+
//!        v                 v
//!     run()             fetch().await
//!   worker thread       caller's runtime
//!   (blocking)
//!        |
//!        v
//!   VariableStore | BootstrapError (fatal, never retried)
//! ```

mod request;
mod worker;

#[cfg(test)]
mod tests;

use std::time::Duration;

use tracing::{debug, info};

use crate::env::{CREDENTIAL_KEY, OriginalEnv, SERVICE_URL_KEY};
use crate::error::BootstrapError;
use crate::store::VariableStore;

use request::Target;

/// Deadline for the whole fetch, measured from request start.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The two values needed to reach the configuration service.
#[derive(Clone, Default)]
pub struct Coordinates {
    service_url: Option<String>,
    credential: Option<String>,
}

impl std::fmt::Debug for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinates")
            .field("service_url", &self.service_url)
            .field("credential", &self.credential.as_ref().map(|_| "[hidden]"))
            .finish()
    }
}

impl Coordinates {
    pub fn new(service_url: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            service_url: Some(service_url.into()),
            credential: Some(credential.into()),
        }
    }

    /// Reads both coordinates from the original environment.
    ///
    /// Empty values count as missing.
    #[must_use]
    pub fn from_env(env: &OriginalEnv) -> Self {
        Self {
            service_url: env.get_non_empty(SERVICE_URL_KEY),
            credential: env.get_non_empty(CREDENTIAL_KEY),
        }
    }

    #[must_use]
    pub fn service_url(&self) -> Option<&str> {
        self.service_url.as_deref()
    }

    /// Validates both coordinates without touching the network.
    fn resolve(&self) -> Result<Target, BootstrapError> {
        let address = self
            .service_url
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| BootstrapError::MissingServiceUrl {
                key: SERVICE_URL_KEY.to_string(),
            })?;
        let credential = self
            .credential
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| BootstrapError::MissingCredential {
                key: CREDENTIAL_KEY.to_string(),
            })?;

        let url = request::endpoint(address)?;
        let authorization =
            request::bearer(credential).ok_or_else(|| BootstrapError::InvalidCredential {
                key: CREDENTIAL_KEY.to_string(),
            })?;
        Ok(Target::new(url, authorization))
    }
}

/// Single-shot fetch of the variable set.
///
/// # Example
/// ```no_run
/// use hermenv::bootstrap::{Bootstrap, Coordinates};
///
/// let store = Bootstrap::new(Coordinates::new("https://config.example.com", "token"))
///     .run()?;
/// println!("{} variables", store.len());
/// # Ok::<(), hermenv::error::BootstrapError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Bootstrap {
    coordinates: Coordinates,
    timeout: Duration,
}

impl Bootstrap {
    #[must_use]
    pub const fn new(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Bootstrap using the coordinates found in the original environment.
    #[must_use]
    pub fn from_env(env: &OriginalEnv) -> Self {
        Self::new(Coordinates::from_env(env))
    }

    /// Overrides the request deadline.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetches the variables, blocking the calling thread until done.
    ///
    /// Works from plain synchronous code and from inside a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns a [`BootstrapError`] if a coordinate is missing or invalid, the
    /// request fails or times out, the service answers with a non-200 status,
    /// or the body is not a variable list.
    pub fn run(&self) -> Result<VariableStore, BootstrapError> {
        let target = self.coordinates.resolve()?;
        info!(url = %target.url(), "bootstrapping environment");
        let store = worker::fetch_blocking(target, self.timeout)?;
        debug!(count = store.len(), "bootstrap complete");
        Ok(store)
    }

    /// Fetches the variables on the caller's runtime.
    ///
    /// # Errors
    ///
    /// Same as [`Bootstrap::run`].
    pub async fn fetch(&self) -> Result<VariableStore, BootstrapError> {
        let target = self.coordinates.resolve()?;
        info!(url = %target.url(), "bootstrapping environment");
        request::fetch_variables(&target, self.timeout).await
    }
}

/// Prints the one-line diagnostic and terminates with status 1.
pub fn exit_with(err: &dyn std::fmt::Display) -> ! {
    eprintln!("hermenv: {err}");
    std::process::exit(1)
}
