// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session event handlers.

use super::MaterializedState;
use sparkq_core::{Event, Session, SessionStatus};

pub(crate) fn apply(state: &mut MaterializedState, event: &Event) {
    match event {
        Event::SessionCreated { id, name, description, at_ms } => {
            // Idempotency: skip if the session already exists
            if !state.sessions.contains_key(id.as_str()) {
                state.sessions.insert(
                    id.as_str().to_string(),
                    Session {
                        id: id.clone(),
                        name: name.clone(),
                        description: description.clone(),
                        status: SessionStatus::Active,
                        started_at_ms: *at_ms,
                        ended_at_ms: None,
                        created_at_ms: *at_ms,
                        updated_at_ms: *at_ms,
                    },
                );
            }
        }

        Event::SessionRenamed { id, name, at_ms } => {
            if let Some(session) = state.sessions.get_mut(id.as_str()) {
                session.name = name.clone();
                session.updated_at_ms = *at_ms;
            }
        }

        Event::SessionEnded { id, at_ms } => {
            if let Some(session) = state.sessions.get_mut(id.as_str()) {
                // Idempotency: ended_at only set on the active → ended edge
                if session.status == SessionStatus::Active {
                    session.status = SessionStatus::Ended;
                    session.ended_at_ms = Some(*at_ms);
                    session.updated_at_ms = *at_ms;
                }
            }
        }

        Event::SessionDeleted { id, queue_ids, task_ids, .. } => {
            state.sessions.remove(id.as_str());
            for queue_id in queue_ids {
                state.queues.remove(queue_id.as_str());
            }
            for task_id in task_ids {
                state.tasks.remove(task_id.as_str());
            }
        }

        _ => {}
    }
}
