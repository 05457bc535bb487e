// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Response shapes. Timestamps are epoch milliseconds.

use serde::{Deserialize, Serialize};
use sparkq_core::{
    CoreError, Queue, QueueId, QueueStatus, Session, SessionId, SessionStatus, Task, TaskClass,
    TaskId, TaskStatus,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    pub git_hash: String,
}

/// `{"error": {"code": "...", "message": "..."}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine-readable kind: `not_found`, `precondition`,
    /// `validation`, `conflict`, `transient`, `internal`.
    pub code: String,
    pub message: String,
}

impl ErrorBody {
    pub fn from_core(err: &CoreError) -> Self {
        Self {
            error: ErrorInfo { code: err.code().to_string(), message: err.to_string() },
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.error.code == "conflict"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDetail {
    pub id: SessionId,
    pub name: String,
    pub description: String,
    pub status: SessionStatus,
    pub started_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<u64>,
    pub created_at: u64,
    pub updated_at: u64,
}

impl From<Session> for SessionDetail {
    fn from(s: Session) -> Self {
        Self {
            id: s.id,
            name: s.name,
            description: s.description,
            status: s.status,
            started_at: s.started_at_ms,
            ended_at: s.ended_at_ms,
            created_at: s.created_at_ms,
            updated_at: s.updated_at_ms,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueDetail {
    pub id: QueueId,
    pub session_id: SessionId,
    pub name: String,
    pub instructions: String,
    pub status: QueueStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_agent_role_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codex_session_id: Option<String>,
    pub created_at: u64,
    pub updated_at: u64,
}

impl From<Queue> for QueueDetail {
    fn from(q: Queue) -> Self {
        Self {
            id: q.id,
            session_id: q.session_id,
            name: q.name,
            instructions: q.instructions,
            status: q.status,
            default_agent_role_key: q.default_agent_role_key,
            codex_session_id: q.codex_session_id,
            created_at: q.created_at_ms,
            updated_at: q.updated_at_ms,
        }
    }
}

/// One row of `GET /api/queues/with-queued`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueWithQueued {
    pub queue: QueueDetail,
    pub queued_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDetail {
    pub id: TaskId,
    pub friendly_id: String,
    pub queue_id: QueueId,
    pub tool_name: String,
    pub task_class: TaskClass,
    pub payload: serde_json::Value,
    pub status: TaskStatus,
    /// Seconds.
    pub timeout: u64,
    pub attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_role_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: u64,
    pub updated_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed_at: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stale_warned_at: Option<u64>,
}

impl From<Task> for TaskDetail {
    fn from(t: Task) -> Self {
        Self {
            id: t.id,
            friendly_id: t.friendly_id,
            queue_id: t.queue_id,
            tool_name: t.tool_name,
            task_class: t.task_class,
            payload: t.payload,
            status: t.status,
            timeout: t.timeout_secs,
            attempts: t.attempts,
            agent_role_key: t.agent_role_key,
            result_summary: t.result_summary,
            result_data: t.result_data,
            error: t.error,
            created_at: t.created_at_ms,
            updated_at: t.updated_at_ms,
            claimed_at: t.claimed_at_ms,
            started_at: t.started_at_ms,
            finished_at: t.finished_at_ms,
            stale_warned_at: t.stale_warned_at_ms,
        }
    }
}

/// One page of a task listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskPage {
    pub tasks: Vec<TaskDetail>,
    /// Matching tasks before pagination.
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
}

/// Queue identity embedded in a claim descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueRef {
    pub id: QueueId,
    pub name: String,
    pub instructions: String,
}

/// The document returned by claim and streamed by the runner: everything
/// an executor needs to run the task and report back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimDescriptor {
    pub id: TaskId,
    pub friendly_id: String,
    pub queue: QueueRef,
    pub tool_name: String,
    pub task_class: TaskClass,
    pub payload: serde_json::Value,
    pub status: TaskStatus,
    /// Seconds.
    pub timeout: u64,
    pub attempts: u32,
    pub created_at: u64,
    pub started_at: u64,
    pub claimed_at: u64,
}

impl ClaimDescriptor {
    /// Build from a freshly claimed task and its queue. The task must be
    /// running; a missing claim stamp falls back to `created_at`.
    pub fn new(task: Task, queue: &Queue) -> Self {
        let started_at = task.started_at_ms.unwrap_or(task.created_at_ms);
        let claimed_at = task.claimed_at_ms.unwrap_or(started_at);
        Self {
            id: task.id,
            friendly_id: task.friendly_id,
            queue: QueueRef {
                id: queue.id.clone(),
                name: queue.name.clone(),
                instructions: queue.instructions.clone(),
            },
            tool_name: task.tool_name,
            task_class: task.task_class,
            payload: task.payload,
            status: task.status,
            timeout: task.timeout_secs,
            attempts: task.attempts,
            created_at: task.created_at_ms,
            started_at,
            claimed_at,
        }
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
