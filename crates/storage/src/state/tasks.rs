// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task event handlers: the state machine's edges.

use super::MaterializedState;
use sparkq_core::{Event, Task, TaskStatus};

pub(crate) fn apply(state: &mut MaterializedState, event: &Event) {
    match event {
        Event::TaskEnqueued { task, queue_seq }
        | Event::TaskRequeued { task, queue_seq, .. } => {
            insert_task(state, task, *queue_seq);
        }

        Event::TaskClaimed { id, at_ms } => {
            if let Some(task) = state.tasks.get_mut(id.as_str()) {
                // Idempotency: attempts only moves on the queued → running
                // edge, so a replayed claim cannot double-count.
                if task.status == TaskStatus::Queued {
                    task.status = TaskStatus::Running;
                    task.claimed_at_ms = Some(*at_ms);
                    task.started_at_ms = Some(*at_ms);
                    task.attempts += 1;
                    task.updated_at_ms = *at_ms;
                }
            }
        }

        Event::TaskCompleted { id, summary, data, at_ms } => {
            if let Some(task) = state.tasks.get_mut(id.as_str()) {
                if task.status == TaskStatus::Running {
                    task.status = TaskStatus::Succeeded;
                    task.result_summary = Some(summary.clone());
                    task.result_data = data.clone();
                    task.finished_at_ms = Some(*at_ms);
                    task.updated_at_ms = *at_ms;
                }
            }
        }

        Event::TaskFailed { id, error, at_ms } => {
            if let Some(task) = state.tasks.get_mut(id.as_str()) {
                if task.status == TaskStatus::Running {
                    task.status = TaskStatus::Failed;
                    task.error = Some(error.clone());
                    task.finished_at_ms = Some(*at_ms);
                    task.updated_at_ms = *at_ms;
                }
            }
        }

        Event::TaskStaleWarned { id, at_ms } => {
            if let Some(task) = state.tasks.get_mut(id.as_str()) {
                if task.status == TaskStatus::Running && task.stale_warned_at_ms.is_none() {
                    task.stale_warned_at_ms = Some(*at_ms);
                    task.updated_at_ms = *at_ms;
                }
            }
        }

        Event::TaskUpdated { id, payload, timeout_secs, agent_role_key, at_ms } => {
            if let Some(task) = state.tasks.get_mut(id.as_str()) {
                if task.status == TaskStatus::Queued {
                    task.payload = payload.clone();
                    task.timeout_secs = *timeout_secs;
                    task.agent_role_key = agent_role_key.clone();
                    task.updated_at_ms = *at_ms;
                }
            }
        }

        Event::TaskDeleted { id, .. } => {
            state.tasks.remove(id.as_str());
        }

        Event::TasksPurged { task_ids, .. } => {
            for task_id in task_ids {
                state.tasks.remove(task_id.as_str());
            }
        }

        _ => {}
    }
}

fn insert_task(state: &mut MaterializedState, task: &Task, queue_seq: u64) {
    // Idempotency: skip if the task already exists
    if !state.tasks.contains_key(task.id.as_str()) {
        state.tasks.insert(task.id.as_str().to_string(), task.clone());
    }
    // The friendly-label counter never rewinds, even across replays.
    if let Some(queue) = state.queues.get_mut(task.queue_id.as_str()) {
        queue.task_seq = queue.task_seq.max(queue_seq);
    }
}
