// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The core operation layer: validation, tool resolution, and bounded
//! retry on transient store errors. HTTP handlers call these; nothing
//! here knows about axum.

pub mod queues;
pub mod sessions;
pub mod tasks;

use sparkq_core::CoreError;
use std::time::Duration;

/// Attempts per operation before a transient error surfaces as 503.
const MAX_TRANSIENT_ATTEMPTS: u32 = 3;

/// Run a store operation, retrying transient failures with a short
/// backoff. Everything else surfaces on the first attempt.
pub(crate) async fn with_retry<T, F>(mut op: F) -> Result<T, CoreError>
where
    F: FnMut() -> Result<T, CoreError>,
{
    let mut attempt = 1;
    loop {
        match op() {
            Err(e) if e.is_transient() && attempt < MAX_TRANSIENT_ATTEMPTS => {
                tracing::debug!(attempt, error = %e, "transient store error, retrying");
                tokio::time::sleep(Duration::from_millis(25 * u64::from(attempt))).await;
                attempt += 1;
            }
            other => return other,
        }
    }
}

#[cfg(test)]
#[path = "../ops_tests.rs"]
mod tests;
