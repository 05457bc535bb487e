// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;
use yare::parameterized;

#[parameterized(
    spaces = { "Back End", 1, "BACK-END-1" },
    single_word = { "triage", 2, "TRIAGE-2" },
    punctuation = { "ops/incident #7", 3, "OPS-INCIDENT-7-3" },
    already_upper = { "QA", 10, "QA-10" },
    leading_junk = { "  weird  ", 1, "WEIRD-1" },
    all_junk = { "***", 4, "TASK-4" },
)]
fn friendly_labels(queue_name: &str, seq: u64, expected: &str) {
    assert_eq!(friendly_label(queue_name, seq), expected);
}

#[parameterized(
    active = { QueueStatus::Active, true },
    idle = { QueueStatus::Idle, true },
    planned = { QueueStatus::Planned, true },
    ended = { QueueStatus::Ended, false },
    archived = { QueueStatus::Archived, false },
)]
fn accepts_tasks_by_status(status: QueueStatus, accepts: bool) {
    let queue = crate::test_support::queue().status(status).build();
    assert_eq!(queue.accepts_tasks(), accepts);
}

#[test]
fn status_serializes_lowercase() {
    let json = serde_json::to_string(&QueueStatus::Archived).unwrap();
    assert_eq!(json, "\"archived\"");
}

proptest! {
    /// Labels are uppercase-ASCII slugs ending in the sequence number,
    /// regardless of what the queue was named.
    #[test]
    fn friendly_label_shape(name in ".{0,40}", seq in 1u64..10_000) {
        let label = friendly_label(&name, seq);
        let suffix = format!("-{}", seq);
        prop_assert!(label.ends_with(&suffix));
        let slug = &label[..label.len() - suffix.len()];
        prop_assert!(!slug.is_empty());
        prop_assert!(!slug.starts_with('-'));
        prop_assert!(slug.chars().all(|c| c == '-' || c.is_ascii_uppercase() || c.is_ascii_digit()));
    }
}
