// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

#[test]
fn lock_file_records_our_pid() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("runner.lock");

    let lock = RunnerLock::acquire_at(path.clone()).unwrap();
    let recorded = std::fs::read_to_string(&path).unwrap();
    assert_eq!(recorded.trim(), std::process::id().to_string());
    drop(lock);
}

#[test]
fn second_acquire_reports_the_holder() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("runner.lock");

    let _held = RunnerLock::acquire_at(path.clone()).unwrap();
    let err = RunnerLock::acquire_at(path).unwrap_err();

    match err {
        LockError::Held { pid, .. } => {
            assert_eq!(pid, std::process::id().to_string());
        }
        other => panic!("expected Held, got {other:?}"),
    }
}

#[test]
fn release_on_drop_allows_reacquire() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("runner.lock");

    {
        let _lock = RunnerLock::acquire_at(path.clone()).unwrap();
        assert!(path.exists());
    }
    // Dropped: the file is gone and the lock is free.
    assert!(!path.exists());
    let _lock = RunnerLock::acquire_at(path).unwrap();
}

#[test]
fn stale_pid_from_dead_holder_is_overwritten() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("runner.lock");

    // A crashed runner leaves its pid behind; the advisory lock itself
    // died with the process, so acquisition succeeds and replaces it.
    std::fs::write(&path, "999999\n").unwrap();

    let _lock = RunnerLock::acquire_at(path.clone()).unwrap();
    let recorded = std::fs::read_to_string(&path).unwrap();
    assert_eq!(recorded.trim(), std::process::id().to_string());
}

#[test]
fn lock_path_derives_from_queue_id() {
    let path = RunnerLock::path_for(&sparkq_core::QueueId::from_string("que-abc123"));
    let name = path.file_name().unwrap().to_str().unwrap();
    assert_eq!(name, "sparkq-runner-que-abc123.lock");
}
