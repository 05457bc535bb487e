// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sparkq_core::{FakeClock, ProjectSeed, Queue, Task, TaskClass};
use sparkq_storage::{DurabilityMode, StoreOptions};
use tempfile::TempDir;

fn store_with_queue(dir: &TempDir, clock: FakeClock) -> (Store<FakeClock>, Queue) {
    let store = Store::open(
        dir.path(),
        StoreOptions {
            mode: DurabilityMode::Durable,
            project: ProjectSeed { name: "sparkq".into(), repo_path: ".".into() },
        },
        clock,
    )
    .unwrap();
    let session = store.create_session("sess1", "").unwrap();
    let queue = store.create_queue(&session.id, "Q1", "", None).unwrap();
    (store, queue)
}

fn claimed_task(store: &Store<FakeClock>, queue: &Queue, timeout_secs: u64) -> Task {
    let task = store
        .create_task(
            &queue.id,
            "llm-sonnet",
            TaskClass::LlmLite,
            serde_json::Value::Null,
            timeout_secs,
            None,
        )
        .unwrap();
    store.atomic_claim(&task.id).unwrap().unwrap()
}

// A task past twice its timeout is auto-failed in one tick, with no
// prior warning needed.
#[test]
fn auto_fail_past_twice_timeout() {
    let dir = TempDir::new().unwrap();
    let clock = FakeClock::new();
    let (store, queue) = store_with_queue(&dir, clock.clone());
    let task = claimed_task(&store, &queue, 1);

    clock.advance_secs(3);
    let sweep = stale_sweep(&store);
    assert_eq!(sweep.auto_failed, vec![task.id.clone()]);
    assert!(sweep.warned.is_empty());

    let task = store.get_task(&task.id).unwrap();
    assert_eq!(task.status, sparkq_core::TaskStatus::Failed);
    assert_eq!(task.attempts, 1);
    let error = task.error.unwrap();
    assert!(error.contains("timeout"), "error should name the timeout: {error}");
    assert!(error.contains("auto-failed"));
}

// Warn first, then auto-fail on a later tick.
#[test]
fn stale_warning_precedes_auto_fail() {
    let dir = TempDir::new().unwrap();
    let clock = FakeClock::new();
    let (store, queue) = store_with_queue(&dir, clock.clone());
    let task = claimed_task(&store, &queue, 10);

    clock.advance_secs(11);
    let sweep = stale_sweep(&store);
    assert_eq!(sweep.warned, vec![task.id.clone()]);
    assert!(sweep.auto_failed.is_empty());

    let warned = store.get_task(&task.id).unwrap();
    assert_eq!(warned.status, sparkq_core::TaskStatus::Running);
    assert!(warned.stale_warned_at_ms.is_some());

    // Second tick inside the stale window does nothing (idempotent warn).
    let sweep = stale_sweep(&store);
    assert!(sweep.warned.is_empty());
    assert!(sweep.auto_failed.is_empty());

    clock.advance_secs(10);
    let sweep = stale_sweep(&store);
    assert_eq!(sweep.auto_failed, vec![task.id.clone()]);
    assert_eq!(store.get_task(&task.id).unwrap().status, sparkq_core::TaskStatus::Failed);
}

#[test]
fn healthy_running_tasks_are_untouched() {
    let dir = TempDir::new().unwrap();
    let clock = FakeClock::new();
    let (store, queue) = store_with_queue(&dir, clock.clone());
    let task = claimed_task(&store, &queue, 60);

    clock.advance_secs(30);
    let sweep = stale_sweep(&store);
    assert!(sweep.warned.is_empty());
    assert!(sweep.auto_failed.is_empty());
    assert_eq!(store.get_task(&task.id).unwrap().status, sparkq_core::TaskStatus::Running);
}

// Purge removes old terminal tasks; queued peers of the same age stay.
#[test]
fn purge_sweep_honors_retention_and_status() {
    let dir = TempDir::new().unwrap();
    let clock = FakeClock::new();
    let (store, queue) = store_with_queue(&dir, clock.clone());

    let finished = claimed_task(&store, &queue, 60);
    store.complete(&finished.id, "done", None).unwrap();
    let queued = store
        .create_task(&queue.id, "t", TaskClass::FastScript, serde_json::Value::Null, 60, None)
        .unwrap();

    clock.advance_secs(10 * 24 * 3600);
    let purged = purge_sweep(&store, Duration::from_secs(3 * 24 * 3600)).unwrap();
    assert_eq!(purged, 1);
    assert!(store.get_task(&finished.id).is_err());
    assert!(store.get_task(&queued.id).is_ok());

    // Idempotent: nothing left to purge.
    assert_eq!(purge_sweep(&store, Duration::from_secs(3 * 24 * 3600)).unwrap(), 0);
}

#[test]
fn fresh_terminal_tasks_survive_purge() {
    let dir = TempDir::new().unwrap();
    let clock = FakeClock::new();
    let (store, queue) = store_with_queue(&dir, clock.clone());

    let finished = claimed_task(&store, &queue, 60);
    store.complete(&finished.id, "done", None).unwrap();

    clock.advance_secs(24 * 3600);
    let purged = purge_sweep(&store, Duration::from_secs(3 * 24 * 3600)).unwrap();
    assert_eq!(purged, 0);
    assert!(store.get_task(&finished.id).is_ok());
}

#[tokio::test]
async fn loops_stop_on_cancellation() {
    let dir = TempDir::new().unwrap();
    let clock = FakeClock::new();
    let (store, _queue) = store_with_queue(&dir, clock);

    let token = CancellationToken::new();
    let handles = spawn(
        Arc::new(store),
        SupervisorConfig {
            stale_interval: Duration::from_secs(3600),
            purge_interval: Duration::from_secs(3600),
            retention: Duration::from_secs(3600),
        },
        token.clone(),
    );

    token.cancel();
    for handle in handles {
        handle.await.unwrap();
    }
}
