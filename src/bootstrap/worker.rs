// hermenv: hermetic remote environment
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Out-of-band fetch worker.
//!
//! ```text
//! caller thread                      worker thread "hermenv-bootstrap"
//! -------------                      ---------------------------------
//! bounded(1) channel
//! spawn  --------------------------> current_thread runtime
//!                                    block_on(fetch_variables)
//! recv_deadline(timeout + grace) <--- send(Result)   (exactly once)
//!    |
//!    +-- Ok(result)      -> result
//!    +-- Timeout         -> BootstrapError::Timeout
//!    +-- Disconnected    -> BootstrapError::Worker
//! ```
//!
//! The worker owns its runtime, so the caller may itself be running inside
//! a tokio runtime without tripping the nested-runtime panic.

use std::time::{Duration, Instant};

use flume::RecvTimeoutError;
use tracing::{debug, warn};

use super::request::{Target, fetch_variables, millis};
use crate::error::BootstrapError;
use crate::store::VariableStore;

/// Extra time the caller waits beyond the request timeout before giving up on the worker.
const WORKER_GRACE: Duration = Duration::from_secs(1);

/// Runs the fetch on a dedicated thread and blocks until it reports back.
pub(super) fn fetch_blocking(
    target: Target,
    timeout: Duration,
) -> Result<VariableStore, BootstrapError> {
    let url = target.url().to_string();
    let (tx, rx) = flume::bounded(1);

    let handle = std::thread::Builder::new()
        .name("hermenv-bootstrap".to_string())
        .spawn(move || {
            let result = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| BootstrapError::Worker {
                    message: format!("failed to start runtime: {e}"),
                })
                .and_then(|runtime| runtime.block_on(fetch_variables(&target, timeout)));

            if let Err(err) = &result {
                debug!(kind = %err.kind(), "fetch worker failed");
            }
            // The receiver is gone only if the caller already timed out.
            let _ = tx.send(result);
        })
        .map_err(|e| BootstrapError::Worker {
            message: format!("failed to spawn fetch thread: {e}"),
        })?;

    let wait = timeout.saturating_add(WORKER_GRACE);
    let received = match Instant::now().checked_add(wait) {
        Some(deadline) => rx.recv_deadline(deadline),
        // No representable deadline; the request timeout still bounds the worker.
        None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
    };

    match received {
        Ok(result) => {
            if handle.join().is_err() {
                warn!("fetch worker panicked after reporting");
            }
            result
        }
        Err(RecvTimeoutError::Timeout) => Err(BootstrapError::Timeout {
            url,
            timeout_ms: millis(timeout),
        }),
        Err(RecvTimeoutError::Disconnected) => Err(BootstrapError::Worker {
            message: "fetch worker exited without a result".to_string(),
        }),
    }
}
