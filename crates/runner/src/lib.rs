// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sparkq-runner: the per-queue runner process.
//!
//! One runner per queue, enforced with an advisory file lock. The runner
//! polls the server, atomically claims the oldest queued task, emits the
//! claim descriptor on stdout for an external executor, and resumes
//! polling. It never executes tasks itself.

pub mod client;
pub mod lock;
pub mod poll;

pub use client::{ClientError, ControlClient, HttpControlClient};
pub use lock::{LockError, RunnerLock};
pub use poll::{Mode, RunSummary, RunnerError, RunnerOptions};
