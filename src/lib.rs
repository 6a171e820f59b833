// hermenv: hermetic remote environment
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)        cmd (exec/get/list)
//!                |                     |
//!                v                     v
//!             config            install (OnceLock)
//!          TOML + HERMENV__*     Uninitialized -> Fetching
//!                                  -> Installed | Failed
//!                                      |
//!                       +--------------+-------------+
//!                       v                            v
//!                  bootstrap                    env::VirtualEnv
//!           worker thread + runtime          preserved -> OriginalEnv
//!           GET {base}/variables             others    -> VariableStore
//!                       |                            ^
//!                       +----------> store ----------+
//!
//!   +-----------------------------------------+
//!   |  foundation        error, logging       |
//!   +-----------------------------------------+
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use hermenv::Environment;
//!
//! // Exits with status 1 and a one-line diagnostic if the fetch fails.
//! let env = hermenv::install();
//! let host = env.read("DB_HOST").unwrap_or_default();
//! # let _ = host;
//! ```

pub mod bootstrap;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod env;
pub mod error;
pub mod install;
pub mod logging;
pub mod store;

pub use env::{Environment, VirtualEnv};
pub use install::{
    InstallState, install, install_with, installed, state, try_install, try_install_with,
};
