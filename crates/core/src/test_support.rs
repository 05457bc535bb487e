// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Record builders with sensible defaults for tests in this workspace.

use crate::id::{QueueId, SessionId, TaskId};
use crate::queue::{Queue, QueueStatus};
use crate::session::{Session, SessionStatus};
use crate::task::{Task, TaskStatus};
use crate::tools::TaskClass;

pub fn task() -> TaskBuilder {
    TaskBuilder::default()
}

pub fn queue() -> QueueBuilder {
    QueueBuilder::default()
}

pub fn session() -> SessionBuilder {
    SessionBuilder::default()
}

pub struct TaskBuilder {
    task: Task,
}

impl Default for TaskBuilder {
    fn default() -> Self {
        Self {
            task: Task {
                id: TaskId::generate(),
                friendly_id: "TEST-1".to_string(),
                queue_id: QueueId::from_string("que-test"),
                tool_name: "llm-sonnet".to_string(),
                task_class: TaskClass::MediumScript,
                payload: serde_json::json!({}),
                status: TaskStatus::Queued,
                timeout_secs: 60,
                attempts: 0,
                agent_role_key: None,
                result_summary: None,
                result_data: None,
                error: None,
                created_at_ms: 1_000_000_000,
                updated_at_ms: 1_000_000_000,
                claimed_at_ms: None,
                started_at_ms: None,
                finished_at_ms: None,
                stale_warned_at_ms: None,
            },
        }
    }
}

impl TaskBuilder {
    pub fn id(mut self, v: impl Into<TaskId>) -> Self {
        self.task.id = v.into();
        self
    }

    pub fn friendly_id(mut self, v: impl Into<String>) -> Self {
        self.task.friendly_id = v.into();
        self
    }

    pub fn queue_id(mut self, v: impl Into<QueueId>) -> Self {
        self.task.queue_id = v.into();
        self
    }

    pub fn tool_name(mut self, v: impl Into<String>) -> Self {
        self.task.tool_name = v.into();
        self
    }

    pub fn task_class(mut self, v: TaskClass) -> Self {
        self.task.task_class = v;
        self
    }

    pub fn payload(mut self, v: serde_json::Value) -> Self {
        self.task.payload = v;
        self
    }

    pub fn status(mut self, v: TaskStatus) -> Self {
        self.task.status = v;
        self
    }

    pub fn timeout_secs(mut self, v: u64) -> Self {
        self.task.timeout_secs = v;
        self
    }

    pub fn attempts(mut self, v: u32) -> Self {
        self.task.attempts = v;
        self
    }

    pub fn created_at_ms(mut self, v: u64) -> Self {
        self.task.created_at_ms = v;
        self
    }

    pub fn started_at_ms(mut self, v: u64) -> Self {
        self.task.started_at_ms = Some(v);
        self.task.claimed_at_ms = Some(v);
        self
    }

    pub fn finished_at_ms(mut self, v: u64) -> Self {
        self.task.finished_at_ms = Some(v);
        self
    }

    pub fn result_summary(mut self, v: impl Into<String>) -> Self {
        self.task.result_summary = Some(v.into());
        self
    }

    pub fn error(mut self, v: impl Into<String>) -> Self {
        self.task.error = Some(v.into());
        self
    }

    pub fn stale_warned_at_ms(mut self, v: u64) -> Self {
        self.task.stale_warned_at_ms = Some(v);
        self
    }

    pub fn build(self) -> Task {
        self.task
    }
}

pub struct QueueBuilder {
    queue: Queue,
}

impl Default for QueueBuilder {
    fn default() -> Self {
        Self {
            queue: Queue {
                id: QueueId::from_string("que-test"),
                session_id: SessionId::from_string("ses-test"),
                name: "Test Queue".to_string(),
                instructions: String::new(),
                status: QueueStatus::Active,
                default_agent_role_key: None,
                codex_session_id: None,
                task_seq: 0,
                created_at_ms: 1_000_000_000,
                updated_at_ms: 1_000_000_000,
            },
        }
    }
}

impl QueueBuilder {
    pub fn id(mut self, v: impl Into<QueueId>) -> Self {
        self.queue.id = v.into();
        self
    }

    pub fn session_id(mut self, v: impl Into<SessionId>) -> Self {
        self.queue.session_id = v.into();
        self
    }

    pub fn name(mut self, v: impl Into<String>) -> Self {
        self.queue.name = v.into();
        self
    }

    pub fn instructions(mut self, v: impl Into<String>) -> Self {
        self.queue.instructions = v.into();
        self
    }

    pub fn status(mut self, v: QueueStatus) -> Self {
        self.queue.status = v;
        self
    }

    pub fn task_seq(mut self, v: u64) -> Self {
        self.queue.task_seq = v;
        self
    }

    pub fn build(self) -> Queue {
        self.queue
    }
}

pub struct SessionBuilder {
    session: Session,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self {
            session: Session {
                id: SessionId::from_string("ses-test"),
                name: "test session".to_string(),
                description: String::new(),
                status: SessionStatus::Active,
                started_at_ms: 1_000_000_000,
                ended_at_ms: None,
                created_at_ms: 1_000_000_000,
                updated_at_ms: 1_000_000_000,
            },
        }
    }
}

impl SessionBuilder {
    pub fn id(mut self, v: impl Into<SessionId>) -> Self {
        self.session.id = v.into();
        self
    }

    pub fn name(mut self, v: impl Into<String>) -> Self {
        self.session.name = v.into();
        self
    }

    pub fn status(mut self, v: SessionStatus) -> Self {
        self.session.status = v;
        self
    }

    pub fn build(self) -> Session {
        self.session
    }
}
