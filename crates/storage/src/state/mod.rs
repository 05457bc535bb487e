// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized state rebuilt from snapshot plus WAL replay.
//!
//! # Idempotency requirement
//!
//! Every event handler MUST be idempotent: applying the same event twice
//! must produce the same state as applying it once. Recovery can replay an
//! event that the pre-crash process already applied. Guidelines:
//!
//! - Guard inserts with existence checks.
//! - Guard increments with status transitions (`attempts` only moves on
//!   the `queued → running` edge).
//! - Use assignment over mutation for field updates.

mod queues;
mod sessions;
mod tasks;

use serde::{Deserialize, Serialize};
use sparkq_core::{Event, Project, Queue, QueueId, Session, Task, TaskStatus};
use std::collections::HashMap;

/// Flat relational rows keyed by opaque ids. The store's single write
/// lock is the transaction boundary; nothing here does I/O.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MaterializedState {
    pub project: Option<Project>,
    #[serde(default)]
    pub sessions: HashMap<String, Session>,
    #[serde(default)]
    pub queues: HashMap<String, Queue>,
    #[serde(default)]
    pub tasks: HashMap<String, Task>,
}

impl MaterializedState {
    /// Apply one event. Events are facts; state is derived from them.
    pub fn apply_event(&mut self, event: &Event) {
        match event {
            Event::ProjectInitialized { id, name, repo_path, at_ms } => {
                if self.project.is_none() {
                    self.project = Some(Project {
                        id: id.clone(),
                        name: name.clone(),
                        repo_path: repo_path.clone(),
                        created_at_ms: *at_ms,
                        updated_at_ms: *at_ms,
                    });
                }
            }

            Event::SessionCreated { .. }
            | Event::SessionRenamed { .. }
            | Event::SessionEnded { .. }
            | Event::SessionDeleted { .. } => sessions::apply(self, event),

            Event::QueueCreated { .. }
            | Event::QueueUpdated { .. }
            | Event::QueueArchived { .. }
            | Event::QueueUnarchived { .. }
            | Event::QueueDeleted { .. } => queues::apply(self, event),

            Event::TaskEnqueued { .. }
            | Event::TaskClaimed { .. }
            | Event::TaskCompleted { .. }
            | Event::TaskFailed { .. }
            | Event::TaskStaleWarned { .. }
            | Event::TaskUpdated { .. }
            | Event::TaskDeleted { .. }
            | Event::TaskRequeued { .. }
            | Event::TasksPurged { .. } => tasks::apply(self, event),
        }
    }

    /// Queue lookup by its globally unique, case-sensitive name.
    pub fn queue_by_name(&self, name: &str) -> Option<&Queue> {
        self.queues.values().find(|q| q.name == name)
    }

    /// The queued task that `claim` would take next: smallest
    /// `created_at_ms`, ties broken by smallest id.
    pub fn oldest_queued(&self, queue_id: &QueueId) -> Option<&Task> {
        self.tasks
            .values()
            .filter(|t| t.status == TaskStatus::Queued && &t.queue_id == queue_id)
            .min_by(|a, b| {
                a.created_at_ms.cmp(&b.created_at_ms).then_with(|| a.id.cmp(&b.id))
            })
    }
}

#[cfg(test)]
#[path = "../state_tests/mod.rs"]
mod tests;
