// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session and queue lifecycle appliers.

use super::{enqueue_event, state_with_queue};
use crate::MaterializedState;
use sparkq_core::{Event, QueueId, QueueStatus, SessionId, SessionStatus};

#[test]
fn session_created_is_idempotent() {
    let mut state = MaterializedState::default();
    let event = Event::SessionCreated {
        id: SessionId::from_string("ses-one"),
        name: "sess1".into(),
        description: String::new(),
        at_ms: 1_000,
    };
    state.apply_event(&event);
    state.apply_event(&event);

    assert_eq!(state.sessions.len(), 1);
    let session = &state.sessions["ses-one"];
    assert_eq!(session.status, SessionStatus::Active);
    assert_eq!(session.started_at_ms, 1_000);
}

#[test]
fn session_ended_sets_ended_at_once() {
    let mut state = MaterializedState::default();
    state.apply_event(&Event::SessionCreated {
        id: SessionId::from_string("ses-one"),
        name: "sess1".into(),
        description: String::new(),
        at_ms: 1_000,
    });

    state.apply_event(&Event::SessionEnded { id: SessionId::from_string("ses-one"), at_ms: 2_000 });
    state.apply_event(&Event::SessionEnded { id: SessionId::from_string("ses-one"), at_ms: 9_000 });

    let session = &state.sessions["ses-one"];
    assert_eq!(session.status, SessionStatus::Ended);
    assert_eq!(session.ended_at_ms, Some(2_000));
}

#[test]
fn session_delete_cascades_listed_ids() {
    let mut state = state_with_queue("que-a", "Back End");
    state.apply_event(&enqueue_event("tsk-one", "que-a", 1));

    state.apply_event(&Event::SessionDeleted {
        id: SessionId::from_string("ses-test"),
        queue_ids: vec![QueueId::from_string("que-a")],
        task_ids: vec!["tsk-one".into()],
        at_ms: 5_000,
    });

    assert!(state.sessions.is_empty());
    assert!(state.queues.is_empty());
    assert!(state.tasks.is_empty());
}

#[test]
fn unarchive_only_moves_archived_queues() {
    let mut state = state_with_queue("que-a", "Back End");

    // Replayed unarchive against an active queue must not touch it.
    state.apply_event(&Event::QueueUnarchived {
        id: QueueId::from_string("que-a"),
        at_ms: 2_000,
    });
    assert_eq!(state.queues["que-a"].status, QueueStatus::Active);

    state.apply_event(&Event::QueueArchived { id: QueueId::from_string("que-a"), at_ms: 3_000 });
    assert_eq!(state.queues["que-a"].status, QueueStatus::Archived);

    state.apply_event(&Event::QueueUnarchived {
        id: QueueId::from_string("que-a"),
        at_ms: 4_000,
    });
    assert_eq!(state.queues["que-a"].status, QueueStatus::Active);
}

#[test]
fn queue_update_replaces_mutable_fields() {
    let mut state = state_with_queue("que-a", "Back End");

    state.apply_event(&Event::QueueUpdated {
        id: QueueId::from_string("que-a"),
        name: "Front End".into(),
        instructions: "be kind".into(),
        status: QueueStatus::Idle,
        default_agent_role_key: Some("builder".into()),
        codex_session_id: Some("cx-123".into()),
        at_ms: 2_000,
    });

    let queue = &state.queues["que-a"];
    assert_eq!(queue.name, "Front End");
    assert_eq!(queue.instructions, "be kind");
    assert_eq!(queue.status, QueueStatus::Idle);
    assert_eq!(queue.codex_session_id.as_deref(), Some("cx-123"));
    assert_eq!(queue.updated_at_ms, 2_000);
}

#[test]
fn queue_delete_removes_its_tasks() {
    let mut state = state_with_queue("que-a", "Back End");
    state.apply_event(&enqueue_event("tsk-one", "que-a", 1));

    state.apply_event(&Event::QueueDeleted {
        id: QueueId::from_string("que-a"),
        task_ids: vec!["tsk-one".into()],
        at_ms: 5_000,
    });

    assert!(state.queues.is_empty());
    assert!(state.tasks.is_empty());
    // The session survives.
    assert_eq!(state.sessions.len(), 1);
}
