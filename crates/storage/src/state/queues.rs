// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queue event handlers.

use super::MaterializedState;
use sparkq_core::{Event, Queue, QueueStatus};

pub(crate) fn apply(state: &mut MaterializedState, event: &Event) {
    match event {
        Event::QueueCreated { id, session_id, name, instructions, default_agent_role_key, at_ms } => {
            // Idempotency: skip if the queue already exists
            if !state.queues.contains_key(id.as_str()) {
                state.queues.insert(
                    id.as_str().to_string(),
                    Queue {
                        id: id.clone(),
                        session_id: session_id.clone(),
                        name: name.clone(),
                        instructions: instructions.clone(),
                        status: QueueStatus::Active,
                        default_agent_role_key: default_agent_role_key.clone(),
                        codex_session_id: None,
                        task_seq: 0,
                        created_at_ms: *at_ms,
                        updated_at_ms: *at_ms,
                    },
                );
            }
        }

        Event::QueueUpdated {
            id,
            name,
            instructions,
            status,
            default_agent_role_key,
            codex_session_id,
            at_ms,
        } => {
            if let Some(queue) = state.queues.get_mut(id.as_str()) {
                queue.name = name.clone();
                queue.instructions = instructions.clone();
                queue.status = *status;
                queue.default_agent_role_key = default_agent_role_key.clone();
                queue.codex_session_id = codex_session_id.clone();
                queue.updated_at_ms = *at_ms;
            }
        }

        Event::QueueArchived { id, at_ms } => {
            if let Some(queue) = state.queues.get_mut(id.as_str()) {
                queue.status = QueueStatus::Archived;
                queue.updated_at_ms = *at_ms;
            }
        }

        Event::QueueUnarchived { id, at_ms } => {
            if let Some(queue) = state.queues.get_mut(id.as_str()) {
                // Only the archived → active edge; a replayed unarchive on
                // a queue that has since moved on must not clobber it.
                if queue.status == QueueStatus::Archived {
                    queue.status = QueueStatus::Active;
                    queue.updated_at_ms = *at_ms;
                }
            }
        }

        Event::QueueDeleted { id, task_ids, .. } => {
            state.queues.remove(id.as_str());
            for task_id in task_ids {
                state.tasks.remove(task_id.as_str());
            }
        }

        _ => {}
    }
}
