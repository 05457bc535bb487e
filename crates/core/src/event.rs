// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted events: one variant per committed state transition.
//!
//! Events are facts. The store validates an operation against current
//! state, appends the event to the WAL, then applies it; recovery replays
//! the same appliers. Every variant therefore carries enough to be applied
//! deterministically: ids, resolved field values, and the wall-clock
//! timestamp captured at commit time: so replay never consults a clock.

use crate::id::{ProjectId, QueueId, SessionId, TaskId};
use crate::queue::QueueStatus;
use crate::task::Task;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// First startup of a data directory.
    ProjectInitialized {
        id: ProjectId,
        name: String,
        repo_path: PathBuf,
        at_ms: u64,
    },

    SessionCreated {
        id: SessionId,
        name: String,
        description: String,
        at_ms: u64,
    },
    SessionRenamed {
        id: SessionId,
        name: String,
        at_ms: u64,
    },
    SessionEnded {
        id: SessionId,
        at_ms: u64,
    },
    /// Cascade carries the ids removed with the session so replay does not
    /// re-derive ownership.
    SessionDeleted {
        id: SessionId,
        queue_ids: Vec<QueueId>,
        task_ids: Vec<TaskId>,
        at_ms: u64,
    },

    QueueCreated {
        id: QueueId,
        session_id: SessionId,
        name: String,
        instructions: String,
        default_agent_role_key: Option<String>,
        at_ms: u64,
    },
    /// Full replacement of the mutable fields, resolved at commit time.
    QueueUpdated {
        id: QueueId,
        name: String,
        instructions: String,
        status: QueueStatus,
        default_agent_role_key: Option<String>,
        codex_session_id: Option<String>,
        at_ms: u64,
    },
    QueueArchived {
        id: QueueId,
        at_ms: u64,
    },
    QueueUnarchived {
        id: QueueId,
        at_ms: u64,
    },
    QueueDeleted {
        id: QueueId,
        task_ids: Vec<TaskId>,
        at_ms: u64,
    },

    /// Carries the complete task record as constructed at enqueue, plus
    /// the friendly-label counter value it consumed.
    TaskEnqueued {
        task: Task,
        queue_seq: u64,
    },
    TaskClaimed {
        id: TaskId,
        at_ms: u64,
    },
    TaskCompleted {
        id: TaskId,
        summary: String,
        data: Option<serde_json::Value>,
        at_ms: u64,
    },
    /// Explicit fail and supervisor auto-fail share this event; the error
    /// text identifies the cause.
    TaskFailed {
        id: TaskId,
        error: String,
        at_ms: u64,
    },
    TaskStaleWarned {
        id: TaskId,
        at_ms: u64,
    },
    /// Full replacement of the editable fields (queued tasks only).
    TaskUpdated {
        id: TaskId,
        payload: serde_json::Value,
        timeout_secs: u64,
        agent_role_key: Option<String>,
        at_ms: u64,
    },
    TaskDeleted {
        id: TaskId,
        at_ms: u64,
    },
    /// Clone-requeue: a fresh task created from a terminal source. The
    /// source task is untouched.
    TaskRequeued {
        source_id: TaskId,
        task: Task,
        queue_seq: u64,
    },
    /// Retention purge. The victim ids are enumerated at commit time so
    /// replay never re-evaluates wall-clock conditions.
    TasksPurged {
        task_ids: Vec<TaskId>,
        cutoff_ms: u64,
        at_ms: u64,
    },
}

impl Event {
    /// Commit timestamp of the event.
    pub fn at_ms(&self) -> u64 {
        match self {
            Event::ProjectInitialized { at_ms, .. }
            | Event::SessionCreated { at_ms, .. }
            | Event::SessionRenamed { at_ms, .. }
            | Event::SessionEnded { at_ms, .. }
            | Event::SessionDeleted { at_ms, .. }
            | Event::QueueCreated { at_ms, .. }
            | Event::QueueUpdated { at_ms, .. }
            | Event::QueueArchived { at_ms, .. }
            | Event::QueueUnarchived { at_ms, .. }
            | Event::QueueDeleted { at_ms, .. }
            | Event::TaskClaimed { at_ms, .. }
            | Event::TaskCompleted { at_ms, .. }
            | Event::TaskFailed { at_ms, .. }
            | Event::TaskStaleWarned { at_ms, .. }
            | Event::TaskUpdated { at_ms, .. }
            | Event::TaskDeleted { at_ms, .. }
            | Event::TasksPurged { at_ms, .. } => *at_ms,
            Event::TaskEnqueued { task, .. } | Event::TaskRequeued { task, .. } => {
                task.created_at_ms
            }
        }
    }
}
