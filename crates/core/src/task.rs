// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task record and the status half of its state machine.
//!
//! Transitions themselves are guarded by the store; this module only
//! defines the shape of a task and the time arithmetic the supervisor
//! uses to classify running tasks as stale or expired.

use crate::tools::TaskClass;
use serde::{Deserialize, Serialize};

pub use crate::id::{QueueId, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Queued,
    Running,
    Succeeded,
    Failed,
}

crate::simple_display! {
    TaskStatus {
        Queued => "queued",
        Running => "running",
        Succeeded => "succeeded",
        Failed => "failed",
    }
}

impl TaskStatus {
    /// Terminal states are absorbing: no edge leaves them except deletion
    /// or requeue (which creates a new task).
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Succeeded | TaskStatus::Failed)
    }
}

/// A unit of work belonging to exactly one queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Per-queue human label (`BACK-END-3`). Assigned at enqueue, never
    /// reused even if earlier tasks are deleted.
    pub friendly_id: String,
    pub queue_id: QueueId,
    pub tool_name: String,
    pub task_class: TaskClass,
    /// Opaque blob interpreted by the executor, not by the core.
    pub payload: serde_json::Value,
    pub status: TaskStatus,
    pub timeout_secs: u64,
    /// Incremented exactly once per successful claim.
    pub attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_role_key: Option<String>,
    /// Non-empty whenever `status == Succeeded`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at_ms: u64,
    pub updated_at_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed_at_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stale_warned_at_ms: Option<u64>,
}

impl Task {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Milliseconds spent running as of `now_ms`; None unless running.
    pub fn running_elapsed_ms(&self, now_ms: u64) -> Option<u64> {
        if self.status != TaskStatus::Running {
            return None;
        }
        self.started_at_ms.map(|started| now_ms.saturating_sub(started))
    }

    /// Running past its timeout but not yet past twice the timeout.
    pub fn is_stale(&self, now_ms: u64) -> bool {
        match self.running_elapsed_ms(now_ms) {
            Some(elapsed) => elapsed > self.timeout_secs * 1000,
            None => false,
        }
    }

    /// Running past twice its timeout: the definitive dead-task condition.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        match self.running_elapsed_ms(now_ms) {
            Some(elapsed) => elapsed > 2 * self.timeout_secs * 1000,
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
