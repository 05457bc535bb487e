// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background supervision: stale-warn/auto-fail and retention purge.
//!
//! Two periodic loops over the store. Each sweep is one pass over current
//! state with no long-lived locks, so the loops interleave safely with
//! live traffic. A task that crosses its timeout gets the soft warning
//! first; past twice its timeout it is auto-failed. Terminal tasks older
//! than the retention window are purged.

use sparkq_core::{Clock, TaskId, TaskStatus};
use sparkq_storage::{Store, TaskFilter};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Loop periods and the retention window, from configuration.
#[derive(Debug, Clone, Copy)]
pub struct SupervisorConfig {
    /// Stale-loop period (`queue_runner.auto_fail_interval_seconds`).
    pub stale_interval: Duration,
    /// Purge-loop period (`purge.interval_hours`).
    pub purge_interval: Duration,
    /// Terminal-task retention (`purge.older_than_days`).
    pub retention: Duration,
}

/// What one stale sweep did.
#[derive(Debug, Default, Clone)]
pub struct StaleSweep {
    pub warned: Vec<TaskId>,
    pub auto_failed: Vec<TaskId>,
}

/// Spawn both loops. They stop between ticks when the token fires.
pub fn spawn<C: Clock>(
    store: Arc<Store<C>>,
    config: SupervisorConfig,
    token: CancellationToken,
) -> Vec<JoinHandle<()>> {
    let stale = {
        let store = Arc::clone(&store);
        let token = token.clone();
        tokio::spawn(async move {
            run_loop(token, config.stale_interval, move || {
                let sweep = stale_sweep(&store);
                if !sweep.warned.is_empty() || !sweep.auto_failed.is_empty() {
                    info!(
                        warned = sweep.warned.len(),
                        auto_failed = sweep.auto_failed.len(),
                        "stale sweep"
                    );
                }
            })
            .await;
        })
    };

    let purge = tokio::spawn(async move {
        run_loop(token, config.purge_interval, move || {
            match purge_sweep(&store, config.retention) {
                Ok(0) => {}
                Ok(purged) => info!(purged, "purged terminal tasks past retention"),
                Err(e) => warn!("purge sweep failed: {e}"),
            }
        })
        .await;
    });

    vec![stale, purge]
}

async fn run_loop<F: FnMut()>(token: CancellationToken, period: Duration, mut tick: F) {
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(period) => tick(),
        }
    }
}

/// One pass over running tasks.
///
/// Past twice the timeout the task is auto-failed outright: even when no
/// warning was ever recorded, so a task that blows through both
/// thresholds between ticks still dies on the next one. Past one timeout
/// it gets the (idempotent) stale warning.
pub fn stale_sweep<C: Clock>(store: &Store<C>) -> StaleSweep {
    let now_ms = store.now_ms();
    let running = store.list_tasks(&TaskFilter {
        status: Some(TaskStatus::Running),
        limit: Some(usize::MAX),
        ..TaskFilter::default()
    });

    let mut sweep = StaleSweep::default();
    for task in running.tasks {
        if task.is_expired(now_ms) {
            let elapsed_secs = task.running_elapsed_ms(now_ms).unwrap_or(0) / 1000;
            let reason = format!(
                "auto-failed: exceeded 2x timeout ({}s limit, ran {}s with no result)",
                task.timeout_secs, elapsed_secs
            );
            match store.auto_fail(&task.id, &reason) {
                Ok(_) => sweep.auto_failed.push(task.id),
                // Lost the race against a concurrent complete/fail; the
                // executor's result stands.
                Err(e) => debug!(task = %task.id, "auto-fail skipped: {e}"),
            }
        } else if task.is_stale(now_ms) && task.stale_warned_at_ms.is_none() {
            match store.mark_stale_warned(&task.id) {
                Ok(true) => sweep.warned.push(task.id),
                Ok(false) => {}
                Err(e) => debug!(task = %task.id, "stale warn skipped: {e}"),
            }
        }
    }
    sweep
}

/// One pass of the retention purge. Queued and running tasks are never
/// touched, regardless of age.
pub fn purge_sweep<C: Clock>(
    store: &Store<C>,
    retention: Duration,
) -> Result<usize, sparkq_core::CoreError> {
    let cutoff_ms = store.now_ms().saturating_sub(retention.as_millis() as u64);
    Ok(store.purge_terminal_older_than(cutoff_ms)?.len())
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
