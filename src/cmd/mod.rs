// hermenv: hermetic remote environment
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> install() --> cmd::run_* handlers
//!                              exec, get, list
//! ```
//!
//! Handlers take the namespace as an injected [`Environment`](crate::env::Environment).

pub mod exec;
pub mod query;
