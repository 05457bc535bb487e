// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Applier tests. Every handler must be idempotent: the store may apply
//! an event that recovery later replays.

mod lifecycle;
mod tasks;

use super::*;
use sparkq_core::{test_support, SessionId, TaskId};

pub(crate) fn state_with_queue(queue_id: &str, name: &str) -> MaterializedState {
    let mut state = MaterializedState::default();
    let session = test_support::session().build();
    state.sessions.insert(session.id.as_str().to_string(), session);
    let queue = test_support::queue()
        .id(queue_id)
        .session_id(SessionId::from_string("ses-test"))
        .name(name)
        .build();
    state.queues.insert(queue_id.to_string(), queue);
    state
}

pub(crate) fn enqueue_event(task_id: &str, queue_id: &str, queue_seq: u64) -> Event {
    let task = test_support::task()
        .id(TaskId::from_string(task_id))
        .queue_id(queue_id)
        .friendly_id(format!("TEST-{queue_seq}"))
        .build();
    Event::TaskEnqueued { task, queue_seq }
}

#[test]
fn project_initialized_is_idempotent() {
    let mut state = MaterializedState::default();
    let event = Event::ProjectInitialized {
        id: sparkq_core::ProjectId::from_string("prj-one"),
        name: "sparkq".into(),
        repo_path: "/repo".into(),
        at_ms: 1,
    };
    state.apply_event(&event);
    let second = Event::ProjectInitialized {
        id: sparkq_core::ProjectId::from_string("prj-two"),
        name: "other".into(),
        repo_path: "/other".into(),
        at_ms: 2,
    };
    state.apply_event(&second);

    let project = state.project.unwrap();
    assert_eq!(project.id.as_str(), "prj-one");
    assert_eq!(project.name, "sparkq");
}

#[test]
fn queue_by_name_is_case_sensitive() {
    let state = state_with_queue("que-a", "Back End");
    assert!(state.queue_by_name("Back End").is_some());
    assert!(state.queue_by_name("back end").is_none());
}

#[test]
fn oldest_queued_orders_by_created_then_id() {
    let mut state = state_with_queue("que-a", "Back End");

    let older = test_support::task()
        .id(TaskId::from_string("tsk-zzz"))
        .queue_id("que-a")
        .created_at_ms(100)
        .build();
    let newer = test_support::task()
        .id(TaskId::from_string("tsk-aaa"))
        .queue_id("que-a")
        .created_at_ms(200)
        .build();
    let tie = test_support::task()
        .id(TaskId::from_string("tsk-mmm"))
        .queue_id("que-a")
        .created_at_ms(100)
        .build();

    for t in [older, newer, tie] {
        state.tasks.insert(t.id.as_str().to_string(), t);
    }

    // Same created_at_ms: the smaller id wins.
    let next = state.oldest_queued(&"que-a".into()).unwrap();
    assert_eq!(next.id.as_str(), "tsk-mmm");
}
