// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[test]
fn generated_ids_carry_prefix_and_length() {
    let id = TaskId::generate();
    assert!(id.as_str().starts_with("tsk-"));
    assert_eq!(id.as_str().len(), 23);
}

#[test]
fn generated_ids_are_unique() {
    let a = QueueId::generate();
    let b = QueueId::generate();
    assert_ne!(a, b);
}

#[parameterized(
    project = { ProjectId::PREFIX, "prj-" },
    session = { SessionId::PREFIX, "ses-" },
    queue = { QueueId::PREFIX, "que-" },
    task = { TaskId::PREFIX, "tsk-" },
)]
fn prefixes_are_four_chars(prefix: &str, expected: &str) {
    assert_eq!(prefix, expected);
    assert_eq!(prefix.len(), 4);
}

#[test]
fn serde_is_transparent() {
    let id = TaskId::from_string("tsk-0123456789abcdefghi");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"tsk-0123456789abcdefghi\"");
    let back: TaskId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}

#[test]
fn ids_compare_against_str() {
    let id = SessionId::from_string("ses-abc");
    assert_eq!(id, "ses-abc");
    assert_ne!(id, "ses-xyz");
}

#[test]
fn ordering_is_lexicographic() {
    // The claim tie-break relies on deterministic id ordering.
    let a = TaskId::from_string("tsk-aaa");
    let b = TaskId::from_string("tsk-bbb");
    assert!(a < b);
}
