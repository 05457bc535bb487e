// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sparkq-server: the long-lived SparkQ server.
//!
//! Owns the store, exposes the HTTP control surface, and runs the two
//! supervisor loops (stale-warn/auto-fail, retention purge). One server
//! per data directory, enforced with a pid-bearing lock file.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod ops;
pub mod supervisor;

pub use config::Config;

/// Crate version, reported by `GET /api/version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Git hash baked in at build time.
pub const GIT_HASH: &str = env!("BUILD_GIT_HASH");
