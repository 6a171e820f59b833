// hermenv: hermetic remote environment
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process-wide installation of the hermetic environment.
//!
//! ```text
//! Uninitialized --install--> Fetching --ok--> Installed   (terminal)
//!                                 \
//!                                  --err--> Failed        (install(): exit 1)
//!
//! install() after Installed  -> same &'static VirtualEnv, no fetch
//! try_install() after Failed -> error, no fetch
//! ```

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError};

use tracing::{debug, info};

use crate::bootstrap::{Bootstrap, exit_with};
use crate::env::{OriginalEnv, VirtualEnv};
use crate::error::{BootstrapError, HermenvResult, bail_out};
use crate::store::VariableStore;

/// Lifecycle of the process-wide environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallState {
    Uninitialized,
    Fetching,
    Installed,
    Failed,
}

impl InstallState {
    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Uninitialized,
            1 => Self::Fetching,
            2 => Self::Installed,
            _ => Self::Failed,
        }
    }

    const fn as_u8(self) -> u8 {
        match self {
            Self::Uninitialized => 0,
            Self::Fetching => 1,
            Self::Installed => 2,
            Self::Failed => 3,
        }
    }
}

/// Holds at most one [`VirtualEnv`] and records how it got there.
///
/// The global instance lives behind [`install`] and [`installed`]; tests
/// build their own.
#[derive(Debug)]
pub struct Installation {
    state: AtomicU8,
    env: OnceLock<VirtualEnv>,
    failure: OnceLock<BootstrapError>,
    guard: Mutex<()>,
}

impl Default for Installation {
    fn default() -> Self {
        Self::new()
    }
}

impl Installation {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(0),
            env: OnceLock::new(),
            failure: OnceLock::new(),
            guard: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn state(&self) -> InstallState {
        InstallState::from_u8(self.state.load(Ordering::Acquire))
    }

    #[must_use]
    pub fn get(&self) -> Option<&VirtualEnv> {
        self.env.get()
    }

    fn set_state(&self, state: InstallState) {
        self.state.store(state.as_u8(), Ordering::Release);
    }

    /// Runs `fetch` once and installs the resulting environment.
    ///
    /// Later calls return the installed environment without calling `fetch`.
    /// After a failure every call returns an error, again without fetching.
    ///
    /// # Errors
    ///
    /// Returns the bootstrap error on the failing call, and a fatal error on
    /// any call after that.
    pub fn install_with<F>(&self, snapshot: OriginalEnv, fetch: F) -> HermenvResult<&VirtualEnv>
    where
        F: FnOnce(&OriginalEnv) -> Result<VariableStore, BootstrapError>,
    {
        if let Some(env) = self.env.get() {
            debug!("environment already installed");
            return Ok(env);
        }

        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(env) = self.env.get() {
            return Ok(env);
        }
        if let Some(err) = self.failure.get() {
            return Err(bail_out(format!("bootstrap already failed: {err}")));
        }
        if self.state() != InstallState::Uninitialized {
            return Err(bail_out("bootstrap already failed: fetch panicked"));
        }

        self.set_state(InstallState::Fetching);
        let unwinding = FailOnUnwind(self);
        let fetched = fetch(&snapshot);
        drop(unwinding);

        match fetched {
            Ok(store) => {
                let count = store.len();
                let env = self.env.get_or_init(|| VirtualEnv::new(store, snapshot));
                self.set_state(InstallState::Installed);
                info!(count, "hermetic environment installed");
                Ok(env)
            }
            Err(err) => {
                debug!(kind = %err.kind(), "bootstrap failed");
                self.set_state(InstallState::Failed);
                let _ = self.failure.set(err.clone());
                Err(err.into())
            }
        }
    }
}

/// Marks the installation failed if `fetch` panics.
struct FailOnUnwind<'a>(&'a Installation);

impl Drop for FailOnUnwind<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.set_state(InstallState::Failed);
        }
    }
}

static INSTALLATION: Installation = Installation::new();

/// The installed environment, if bootstrap has completed.
#[must_use]
pub fn installed() -> Option<&'static VirtualEnv> {
    INSTALLATION.get()
}

#[must_use]
pub fn state() -> InstallState {
    INSTALLATION.state()
}

/// Captures the process environment, bootstraps, and installs.
///
/// # Errors
///
/// Returns the bootstrap failure instead of exiting.
pub fn try_install() -> HermenvResult<&'static VirtualEnv> {
    if let Some(env) = installed() {
        return Ok(env);
    }
    try_install_with(OriginalEnv::capture())
}

/// Like [`try_install`] with an explicit snapshot.
///
/// # Errors
///
/// Returns the bootstrap failure instead of exiting.
pub fn try_install_with(snapshot: OriginalEnv) -> HermenvResult<&'static VirtualEnv> {
    INSTALLATION.install_with(snapshot, |env| Bootstrap::from_env(env).run())
}

/// Captures the process environment, bootstraps, and installs.
///
/// Any failure prints one diagnostic line to stderr and exits with status 1.
pub fn install() -> &'static VirtualEnv {
    try_install().unwrap_or_else(|err| exit_with(&err))
}

/// Like [`install`] with an explicit snapshot.
pub fn install_with(snapshot: OriginalEnv) -> &'static VirtualEnv {
    try_install_with(snapshot).unwrap_or_else(|err| exit_with(&err))
}
