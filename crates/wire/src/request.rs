// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request bodies and query parameters.

use serde::{Deserialize, Serialize};
use sparkq_core::{QueueId, QueueStatus, SessionId, TaskStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Rename and/or end a session. Both fields optional; an empty body is a
/// no-op update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSessionRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ended: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateQueueRequest {
    pub session_id: SessionId,
    pub name: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub default_agent_role_key: Option<String>,
}

/// Mutable queue fields. `archived` mirrors the archive endpoints for
/// callers that prefer a single PUT; an empty string clears an optional
/// key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateQueueRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    /// `active`, `idle`, `planned`, or `ended`. Archiving goes through the
    /// archive endpoints (or `archived` below).
    #[serde(default)]
    pub status: Option<QueueStatus>,
    #[serde(default)]
    pub default_agent_role_key: Option<String>,
    #[serde(default)]
    pub codex_session_id: Option<String>,
    #[serde(default)]
    pub archived: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnqueueRequest {
    pub queue_id: QueueId,
    pub tool_name: String,
    #[serde(default)]
    pub payload: serde_json::Value,
    /// Enqueue-time override of the tool's resolved timeout, in seconds.
    #[serde(default)]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub agent_role_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
    #[serde(default)]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub agent_role_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteRequest {
    pub result_summary: String,
    #[serde(default)]
    pub result_data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailRequest {
    pub error_message: String,
    /// Optional classifier recorded in front of the message.
    #[serde(default)]
    pub error_type: Option<String>,
}

impl FailRequest {
    /// The error text persisted on the task.
    pub fn error_text(&self) -> String {
        match &self.error_type {
            Some(t) if !t.is_empty() => format!("{}: {}", t, self.error_message),
            _ => self.error_message.clone(),
        }
    }
}

/// `GET /api/tasks` filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskListQuery {
    #[serde(default)]
    pub queue_id: Option<QueueId>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    /// Restrict to running tasks past their timeout.
    #[serde(default)]
    pub stale: Option<bool>,
    #[serde(default)]
    pub offset: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// `GET /api/queues` filters. `name` is an exact, case-sensitive match -
/// the runner uses it to resolve its queue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueListQuery {
    #[serde(default)]
    pub session_id: Option<SessionId>,
    #[serde(default)]
    pub name: Option<String>,
}

/// `?cascade=true` on session and queue deletion.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CascadeQuery {
    #[serde(default)]
    pub cascade: Option<bool>,
}

impl CascadeQuery {
    pub fn cascade(&self) -> bool {
        self.cascade.unwrap_or(false)
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
