// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{enqueue_event, state_with_queue};
use sparkq_core::{Event, TaskId, TaskStatus};

#[test]
fn enqueue_inserts_once_and_advances_counter() {
    let mut state = state_with_queue("que-a", "Back End");
    let event = enqueue_event("tsk-one", "que-a", 1);

    state.apply_event(&event);
    state.apply_event(&event);

    assert_eq!(state.tasks.len(), 1);
    assert_eq!(state.queues["que-a"].task_seq, 1);
}

#[test]
fn counter_never_rewinds() {
    let mut state = state_with_queue("que-a", "Back End");
    state.apply_event(&enqueue_event("tsk-b", "que-a", 5));
    // A replayed earlier enqueue must not pull the counter back.
    state.apply_event(&enqueue_event("tsk-a", "que-a", 2));
    assert_eq!(state.queues["que-a"].task_seq, 5);
}

#[test]
fn claim_applies_once_even_when_replayed() {
    let mut state = state_with_queue("que-a", "Back End");
    state.apply_event(&enqueue_event("tsk-one", "que-a", 1));

    let claim = Event::TaskClaimed { id: TaskId::from_string("tsk-one"), at_ms: 2_000 };
    state.apply_event(&claim);
    state.apply_event(&claim);

    let task = &state.tasks["tsk-one"];
    assert_eq!(task.status, TaskStatus::Running);
    assert_eq!(task.attempts, 1);
    assert_eq!(task.claimed_at_ms, Some(2_000));
    assert_eq!(task.started_at_ms, Some(2_000));
}

#[test]
fn complete_requires_running() {
    let mut state = state_with_queue("que-a", "Back End");
    state.apply_event(&enqueue_event("tsk-one", "que-a", 1));

    // Completion of a queued task is a stray event; state must not move.
    let complete = Event::TaskCompleted {
        id: TaskId::from_string("tsk-one"),
        summary: "done".into(),
        data: None,
        at_ms: 3_000,
    };
    state.apply_event(&complete);
    assert_eq!(state.tasks["tsk-one"].status, TaskStatus::Queued);

    state.apply_event(&Event::TaskClaimed { id: TaskId::from_string("tsk-one"), at_ms: 2_000 });
    state.apply_event(&complete);

    let task = &state.tasks["tsk-one"];
    assert_eq!(task.status, TaskStatus::Succeeded);
    assert_eq!(task.result_summary.as_deref(), Some("done"));
    assert_eq!(task.finished_at_ms, Some(3_000));
}

#[test]
fn terminal_states_absorb_late_transitions() {
    let mut state = state_with_queue("que-a", "Back End");
    state.apply_event(&enqueue_event("tsk-one", "que-a", 1));
    state.apply_event(&Event::TaskClaimed { id: TaskId::from_string("tsk-one"), at_ms: 2_000 });
    state.apply_event(&Event::TaskCompleted {
        id: TaskId::from_string("tsk-one"),
        summary: "done".into(),
        data: None,
        at_ms: 3_000,
    });

    // A fail racing the completion loses; the applier ignores it.
    state.apply_event(&Event::TaskFailed {
        id: TaskId::from_string("tsk-one"),
        error: "too late".into(),
        at_ms: 4_000,
    });

    let task = &state.tasks["tsk-one"];
    assert_eq!(task.status, TaskStatus::Succeeded);
    assert!(task.error.is_none());
}

#[test]
fn stale_warned_sets_once() {
    let mut state = state_with_queue("que-a", "Back End");
    state.apply_event(&enqueue_event("tsk-one", "que-a", 1));
    state.apply_event(&Event::TaskClaimed { id: TaskId::from_string("tsk-one"), at_ms: 2_000 });

    state.apply_event(&Event::TaskStaleWarned { id: TaskId::from_string("tsk-one"), at_ms: 5_000 });
    state.apply_event(&Event::TaskStaleWarned { id: TaskId::from_string("tsk-one"), at_ms: 9_000 });

    assert_eq!(state.tasks["tsk-one"].stale_warned_at_ms, Some(5_000));
}

#[test]
fn update_only_touches_queued_tasks() {
    let mut state = state_with_queue("que-a", "Back End");
    state.apply_event(&enqueue_event("tsk-one", "que-a", 1));

    let update = Event::TaskUpdated {
        id: TaskId::from_string("tsk-one"),
        payload: serde_json::json!({"prompt": "edited"}),
        timeout_secs: 120,
        agent_role_key: Some("reviewer".into()),
        at_ms: 1_500,
    };
    state.apply_event(&update);
    assert_eq!(state.tasks["tsk-one"].timeout_secs, 120);

    state.apply_event(&Event::TaskClaimed { id: TaskId::from_string("tsk-one"), at_ms: 2_000 });
    let late = Event::TaskUpdated {
        id: TaskId::from_string("tsk-one"),
        payload: serde_json::json!({}),
        timeout_secs: 1,
        agent_role_key: None,
        at_ms: 2_500,
    };
    state.apply_event(&late);
    assert_eq!(state.tasks["tsk-one"].timeout_secs, 120);
}

#[test]
fn purge_removes_listed_tasks_only() {
    let mut state = state_with_queue("que-a", "Back End");
    state.apply_event(&enqueue_event("tsk-old", "que-a", 1));
    state.apply_event(&enqueue_event("tsk-new", "que-a", 2));

    state.apply_event(&Event::TasksPurged {
        task_ids: vec![TaskId::from_string("tsk-old")],
        cutoff_ms: 100,
        at_ms: 200,
    });

    assert!(!state.tasks.contains_key("tsk-old"));
    assert!(state.tasks.contains_key("tsk-new"));
}

#[test]
fn requeue_inserts_new_task_and_leaves_source_alone() {
    let mut state = state_with_queue("que-a", "Back End");
    state.apply_event(&enqueue_event("tsk-src", "que-a", 1));
    state.apply_event(&Event::TaskClaimed { id: TaskId::from_string("tsk-src"), at_ms: 2_000 });
    state.apply_event(&Event::TaskFailed {
        id: TaskId::from_string("tsk-src"),
        error: "denied".into(),
        at_ms: 3_000,
    });

    let clone = sparkq_core::test_support::task()
        .id(TaskId::from_string("tsk-clone"))
        .queue_id("que-a")
        .friendly_id("TEST-2")
        .build();
    state.apply_event(&Event::TaskRequeued {
        source_id: TaskId::from_string("tsk-src"),
        task: clone,
        queue_seq: 2,
    });

    assert_eq!(state.tasks["tsk-src"].status, TaskStatus::Failed);
    assert_eq!(state.tasks["tsk-src"].error.as_deref(), Some("denied"));
    assert_eq!(state.tasks["tsk-clone"].status, TaskStatus::Queued);
    assert_eq!(state.queues["que-a"].task_seq, 2);
}
