// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support;
use yare::parameterized;

#[parameterized(
    queued = { TaskStatus::Queued, false },
    running = { TaskStatus::Running, false },
    succeeded = { TaskStatus::Succeeded, true },
    failed = { TaskStatus::Failed, true },
)]
fn terminal_states(status: TaskStatus, terminal: bool) {
    assert_eq!(status.is_terminal(), terminal);
}

#[test]
fn elapsed_is_none_unless_running() {
    let task = test_support::task().status(TaskStatus::Queued).build();
    assert_eq!(task.running_elapsed_ms(1_000_000), None);
}

#[test]
fn stale_after_one_timeout() {
    let task = test_support::task()
        .status(TaskStatus::Running)
        .started_at_ms(1_000_000)
        .timeout_secs(10)
        .build();

    // At exactly the timeout boundary: not yet stale.
    assert!(!task.is_stale(1_000_000 + 10_000));
    // One millisecond past: stale, not expired.
    assert!(task.is_stale(1_000_000 + 10_001));
    assert!(!task.is_expired(1_000_000 + 10_001));
}

#[test]
fn expired_after_twice_timeout() {
    let task = test_support::task()
        .status(TaskStatus::Running)
        .started_at_ms(1_000_000)
        .timeout_secs(10)
        .build();

    assert!(!task.is_expired(1_000_000 + 20_000));
    assert!(task.is_expired(1_000_000 + 20_001));
    // An expired task is also past its plain timeout.
    assert!(task.is_stale(1_000_000 + 20_001));
}

#[test]
fn clock_skew_does_not_underflow() {
    // A claim stamped "in the future" relative to the observer.
    let task = test_support::task()
        .status(TaskStatus::Running)
        .started_at_ms(2_000_000)
        .timeout_secs(1)
        .build();
    assert_eq!(task.running_elapsed_ms(1_000_000), Some(0));
    assert!(!task.is_stale(1_000_000));
}

#[test]
fn status_serializes_lowercase() {
    let json = serde_json::to_string(&TaskStatus::Succeeded).unwrap();
    assert_eq!(json, "\"succeeded\"");
}
