// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queue record: a FIFO work lane owned by one session.

use serde::{Deserialize, Serialize};

pub use crate::id::{QueueId, SessionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueStatus {
    Active,
    Idle,
    Planned,
    Ended,
    Archived,
}

crate::simple_display! {
    QueueStatus {
        Active => "active",
        Idle => "idle",
        Planned => "planned",
        Ended => "ended",
        Archived => "archived",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Queue {
    pub id: QueueId,
    pub session_id: SessionId,
    /// Globally unique across all queues, case-sensitive.
    pub name: String,
    /// Free text shown to the runner's operator on startup. May be empty.
    #[serde(default)]
    pub instructions: String,
    pub status: QueueStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_agent_role_key: Option<String>,
    /// Opaque continuation token for an external tool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codex_session_id: Option<String>,
    /// Monotonic friendly-label counter. Advances on every enqueue into
    /// this queue and never rewinds, so labels are never reused.
    #[serde(default)]
    pub task_seq: u64,
    pub created_at_ms: u64,
    pub updated_at_ms: u64,
}

impl Queue {
    /// Whether new tasks may be enqueued (or requeued) into this queue.
    pub fn accepts_tasks(&self) -> bool {
        !matches!(self.status, QueueStatus::Archived | QueueStatus::Ended)
    }
}

/// Per-queue human label for the `seq`-th task: the queue name uppercased
/// with non-alphanumeric runs collapsed to `-`, then the counter.
/// `"Back End"` → `BACK-END-1`, `BACK-END-2`, …
pub fn friendly_label(queue_name: &str, seq: u64) -> String {
    let mut slug = String::with_capacity(queue_name.len());
    let mut pending_dash = false;
    for c in queue_name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_uppercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        slug.push_str("TASK");
    }
    format!("{slug}-{seq}")
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
