// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The store: validated, durable, atomic state transitions.
//!
//! One lock guards the materialized state and the WAL together, so commit
//! order, state order, and the order observed by readers are the same
//! order. A mutation validates against current state, appends its event,
//! flushes (in durable mode), then applies. If two claimers race on one
//! queued task, whoever takes the lock second observes `running` and
//! loses without side effect.

use crate::snapshot::{load_snapshot, write_snapshot};
use crate::state::MaterializedState;
use crate::wal::{Wal, WalError};
use parking_lot::Mutex;
use serde::Serialize;
use sparkq_core::{
    friendly_label, Clock, CoreError, EntityKind, Event, Project, ProjectId, ProjectSeed, Queue,
    QueueId, QueueStatus, Session, SessionId, Task, TaskClass, TaskId, TaskStatus,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// WAL file name inside the data directory.
pub const WAL_FILE: &str = "events.wal";
/// Snapshot file name inside the data directory.
pub const SNAPSHOT_FILE: &str = "snapshot.json";

const DEFAULT_PAGE_LIMIT: usize = 100;

/// How eagerly commits reach disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurabilityMode {
    /// fsync after every committed operation. A returned success is on disk.
    #[default]
    Durable,
    /// OS-buffered appends; fsynced at checkpoints and shutdown.
    Buffered,
}

impl std::str::FromStr for DurabilityMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "durable" => Ok(DurabilityMode::Durable),
            "buffered" => Ok(DurabilityMode::Buffered),
            other => Err(format!("unknown database mode: {other:?} (expected \"durable\" or \"buffered\")")),
        }
    }
}

/// Options for opening a store.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub mode: DurabilityMode,
    /// Identity for the singleton project record, used on first startup.
    pub project: ProjectSeed,
}

/// Filters for task listings. `stale_only` restricts to running tasks past
/// their timeout.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub queue_id: Option<QueueId>,
    pub status: Option<TaskStatus>,
    pub stale_only: bool,
    pub offset: usize,
    pub limit: Option<usize>,
}

/// One page of a task listing plus the unpaginated total.
#[derive(Debug, Clone)]
pub struct TaskPage {
    pub tasks: Vec<Task>,
    pub total: usize,
}

/// Task counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub queued: usize,
    pub running: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Patch for the mutable queue fields. `None` leaves a field unchanged;
/// the double option distinguishes "leave" from "clear".
#[derive(Debug, Clone, Default)]
pub struct QueuePatch {
    pub name: Option<String>,
    pub instructions: Option<String>,
    /// `Archived` is rejected here; archiving has its own operation.
    pub status: Option<QueueStatus>,
    pub default_agent_role_key: Option<Option<String>>,
    pub codex_session_id: Option<Option<String>>,
}

/// Result of a checkpoint: the sequence the snapshot captured.
#[derive(Debug, Clone, Copy)]
pub struct CheckpointSummary {
    pub seq: u64,
    pub tasks: usize,
}

#[derive(Debug)]
struct Inner {
    state: MaterializedState,
    wal: Wal,
}

/// The durable ordered store. Cheap to share behind an `Arc`; every
/// operation takes the single write lock for a short critical section.
#[derive(Debug)]
pub struct Store<C: Clock> {
    inner: Mutex<Inner>,
    clock: C,
    mode: DurabilityMode,
    snapshot_path: PathBuf,
}

impl<C: Clock> Store<C> {
    /// Open a data directory: load the snapshot if present, replay the WAL
    /// tail, and initialize the project record on first startup.
    pub fn open(
        data_dir: impl AsRef<Path>,
        options: StoreOptions,
        clock: C,
    ) -> Result<Self, CoreError> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir)?;
        let snapshot_path = data_dir.join(SNAPSHOT_FILE);
        let wal_path = data_dir.join(WAL_FILE);

        let (mut state, seq) = match load_snapshot(&snapshot_path)
            .map_err(|e| CoreError::Internal(e.to_string()))?
        {
            Some(snapshot) => {
                info!(
                    seq = snapshot.seq,
                    tasks = snapshot.state.tasks.len(),
                    queues = snapshot.state.queues.len(),
                    "loaded snapshot"
                );
                (snapshot.state, snapshot.seq)
            }
            None => (MaterializedState::default(), 0),
        };

        let wal = Wal::open(&wal_path, seq).map_err(wal_to_core)?;
        let tail = wal.entries_after(seq).map_err(wal_to_core)?;
        let replayed = tail.len();
        for entry in tail {
            state.apply_event(&entry.event);
        }
        if replayed > 0 {
            info!(replayed, after_seq = seq, "replayed WAL entries");
        }

        let store = Self {
            inner: Mutex::new(Inner { state, wal }),
            clock,
            mode: options.mode,
            snapshot_path,
        };
        store.ensure_project(options.project)?;
        Ok(store)
    }

    /// Wall-clock reading through the injected clock.
    pub fn now_ms(&self) -> u64 {
        self.clock.epoch_ms()
    }

    fn ensure_project(&self, seed: ProjectSeed) -> Result<(), CoreError> {
        let mut inner = self.inner.lock();
        if inner.state.project.is_some() {
            return Ok(());
        }
        let event = Event::ProjectInitialized {
            id: ProjectId::generate(),
            name: seed.name,
            repo_path: seed.repo_path,
            at_ms: self.clock.epoch_ms(),
        };
        self.commit(&mut inner, vec![event])
    }

    /// Append, flush per the durability mode, then apply. Holding the lock
    /// across all three steps is what makes the transition atomic.
    fn commit(&self, inner: &mut Inner, events: Vec<Event>) -> Result<(), CoreError> {
        for event in &events {
            inner.wal.append(event).map_err(wal_to_core)?;
        }
        if self.mode == DurabilityMode::Durable {
            inner.wal.flush().map_err(wal_to_core)?;
        }
        for event in &events {
            inner.state.apply_event(event);
        }
        Ok(())
    }

    // ---- project ----

    pub fn project(&self) -> Option<Project> {
        self.inner.lock().state.project.clone()
    }

    // ---- sessions ----

    pub fn create_session(&self, name: &str, description: &str) -> Result<Session, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("session name must not be empty".into()));
        }
        let id = SessionId::generate();
        let event = Event::SessionCreated {
            id: id.clone(),
            name: name.to_string(),
            description: description.to_string(),
            at_ms: self.clock.epoch_ms(),
        };

        let mut inner = self.inner.lock();
        self.commit(&mut inner, vec![event])?;
        materialized(inner.state.sessions.get(id.as_str()))
    }

    pub fn get_session(&self, id: &SessionId) -> Result<Session, CoreError> {
        self.inner
            .lock()
            .state
            .sessions
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| CoreError::not_found(EntityKind::Session, id.as_str()))
    }

    pub fn list_sessions(&self) -> Vec<Session> {
        let inner = self.inner.lock();
        let mut sessions: Vec<Session> = inner.state.sessions.values().cloned().collect();
        sessions.sort_by(|a, b| a.created_at_ms.cmp(&b.created_at_ms).then_with(|| a.id.cmp(&b.id)));
        sessions
    }

    pub fn rename_session(&self, id: &SessionId, name: &str) -> Result<Session, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("session name must not be empty".into()));
        }

        let mut inner = self.inner.lock();
        if !inner.state.sessions.contains_key(id.as_str()) {
            return Err(CoreError::not_found(EntityKind::Session, id.as_str()));
        }
        let event = Event::SessionRenamed {
            id: id.clone(),
            name: name.to_string(),
            at_ms: self.clock.epoch_ms(),
        };
        self.commit(&mut inner, vec![event])?;
        materialized(inner.state.sessions.get(id.as_str()))
    }

    pub fn end_session(&self, id: &SessionId) -> Result<Session, CoreError> {
        let mut inner = self.inner.lock();
        let session = inner
            .state
            .sessions
            .get(id.as_str())
            .ok_or_else(|| CoreError::not_found(EntityKind::Session, id.as_str()))?;
        if !session.is_active() {
            return Err(CoreError::precondition("session is already ended", session.status));
        }
        let event = Event::SessionEnded { id: id.clone(), at_ms: self.clock.epoch_ms() };
        self.commit(&mut inner, vec![event])?;
        materialized(inner.state.sessions.get(id.as_str()))
    }

    /// Delete a session. Without `cascade` the session must own no queues;
    /// with it, the session's queues and all their tasks go too.
    pub fn delete_session(&self, id: &SessionId, cascade: bool) -> Result<(), CoreError> {
        let mut inner = self.inner.lock();
        if !inner.state.sessions.contains_key(id.as_str()) {
            return Err(CoreError::not_found(EntityKind::Session, id.as_str()));
        }

        let queue_ids: Vec<QueueId> = inner
            .state
            .queues
            .values()
            .filter(|q| &q.session_id == id)
            .map(|q| q.id.clone())
            .collect();

        if !cascade && !queue_ids.is_empty() {
            return Err(CoreError::precondition(
                "session still owns queues; pass cascade to delete them too",
                format!("{} queue(s)", queue_ids.len()),
            ));
        }

        let task_ids: Vec<TaskId> = inner
            .state
            .tasks
            .values()
            .filter(|t| queue_ids.iter().any(|q| q == &t.queue_id))
            .map(|t| t.id.clone())
            .collect();

        let event = Event::SessionDeleted {
            id: id.clone(),
            queue_ids,
            task_ids,
            at_ms: self.clock.epoch_ms(),
        };
        self.commit(&mut inner, vec![event])
    }

    // ---- queues ----

    pub fn create_queue(
        &self,
        session_id: &SessionId,
        name: &str,
        instructions: &str,
        default_agent_role_key: Option<String>,
    ) -> Result<Queue, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("queue name must not be empty".into()));
        }

        let mut inner = self.inner.lock();
        if !inner.state.sessions.contains_key(session_id.as_str()) {
            return Err(CoreError::not_found(EntityKind::Session, session_id.as_str()));
        }
        if inner.state.queue_by_name(name).is_some() {
            return Err(CoreError::Validation(format!("queue name already in use: {name}")));
        }

        let id = QueueId::generate();
        let event = Event::QueueCreated {
            id: id.clone(),
            session_id: session_id.clone(),
            name: name.to_string(),
            instructions: instructions.to_string(),
            default_agent_role_key,
            at_ms: self.clock.epoch_ms(),
        };
        self.commit(&mut inner, vec![event])?;
        materialized(inner.state.queues.get(id.as_str()))
    }

    pub fn get_queue(&self, id: &QueueId) -> Result<Queue, CoreError> {
        self.inner
            .lock()
            .state
            .queues
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| CoreError::not_found(EntityKind::Queue, id.as_str()))
    }

    pub fn get_queue_by_name(&self, name: &str) -> Result<Queue, CoreError> {
        self.inner
            .lock()
            .state
            .queue_by_name(name)
            .cloned()
            .ok_or_else(|| CoreError::not_found(EntityKind::Queue, name))
    }

    pub fn list_queues(&self, session_id: Option<&SessionId>, name: Option<&str>) -> Vec<Queue> {
        let inner = self.inner.lock();
        let mut queues: Vec<Queue> = inner
            .state
            .queues
            .values()
            .filter(|q| session_id.is_none_or(|s| &q.session_id == s))
            .filter(|q| name.is_none_or(|n| q.name == n))
            .cloned()
            .collect();
        queues.sort_by(|a, b| a.created_at_ms.cmp(&b.created_at_ms).then_with(|| a.id.cmp(&b.id)));
        queues
    }

    pub fn update_queue(&self, id: &QueueId, patch: QueuePatch) -> Result<Queue, CoreError> {
        if patch.status == Some(QueueStatus::Archived) {
            return Err(CoreError::Validation(
                "status cannot be set to archived here; use the archive operation".into(),
            ));
        }

        let mut inner = self.inner.lock();
        let queue = inner
            .state
            .queues
            .get(id.as_str())
            .ok_or_else(|| CoreError::not_found(EntityKind::Queue, id.as_str()))?;

        if queue.status == QueueStatus::Archived && patch.status.is_some() {
            return Err(CoreError::precondition(
                "unarchive the queue before changing its status",
                queue.status,
            ));
        }

        let name = match &patch.name {
            Some(n) => {
                let n = n.trim();
                if n.is_empty() {
                    return Err(CoreError::Validation("queue name must not be empty".into()));
                }
                if n != queue.name && inner.state.queue_by_name(n).is_some() {
                    return Err(CoreError::Validation(format!("queue name already in use: {n}")));
                }
                n.to_string()
            }
            None => queue.name.clone(),
        };

        let event = Event::QueueUpdated {
            id: id.clone(),
            name,
            instructions: patch.instructions.unwrap_or_else(|| queue.instructions.clone()),
            status: patch.status.unwrap_or(queue.status),
            default_agent_role_key: patch
                .default_agent_role_key
                .unwrap_or_else(|| queue.default_agent_role_key.clone()),
            codex_session_id: patch
                .codex_session_id
                .unwrap_or_else(|| queue.codex_session_id.clone()),
            at_ms: self.clock.epoch_ms(),
        };
        self.commit(&mut inner, vec![event])?;
        materialized(inner.state.queues.get(id.as_str()))
    }

    /// Archive is idempotent: archiving an archived queue is a no-op.
    pub fn archive_queue(&self, id: &QueueId) -> Result<Queue, CoreError> {
        let mut inner = self.inner.lock();
        let queue = inner
            .state
            .queues
            .get(id.as_str())
            .ok_or_else(|| CoreError::not_found(EntityKind::Queue, id.as_str()))?;
        if queue.status == QueueStatus::Archived {
            return Ok(queue.clone());
        }
        let event = Event::QueueArchived { id: id.clone(), at_ms: self.clock.epoch_ms() };
        self.commit(&mut inner, vec![event])?;
        materialized(inner.state.queues.get(id.as_str()))
    }

    pub fn unarchive_queue(&self, id: &QueueId) -> Result<Queue, CoreError> {
        let mut inner = self.inner.lock();
        let queue = inner
            .state
            .queues
            .get(id.as_str())
            .ok_or_else(|| CoreError::not_found(EntityKind::Queue, id.as_str()))?;
        if queue.status != QueueStatus::Archived {
            return Err(CoreError::precondition("queue is not archived", queue.status));
        }
        let event = Event::QueueUnarchived { id: id.clone(), at_ms: self.clock.epoch_ms() };
        self.commit(&mut inner, vec![event])?;
        materialized(inner.state.queues.get(id.as_str()))
    }

    /// Delete a queue. Rejected while non-terminal tasks remain, unless
    /// the caller opts into cascade.
    pub fn delete_queue(&self, id: &QueueId, cascade: bool) -> Result<(), CoreError> {
        let mut inner = self.inner.lock();
        if !inner.state.queues.contains_key(id.as_str()) {
            return Err(CoreError::not_found(EntityKind::Queue, id.as_str()));
        }

        let non_terminal = inner
            .state
            .tasks
            .values()
            .filter(|t| &t.queue_id == id && !t.is_terminal())
            .count();
        if non_terminal > 0 && !cascade {
            return Err(CoreError::precondition(
                "queue still has queued or running tasks; pass cascade to delete them too",
                format!("{non_terminal} non-terminal task(s)"),
            ));
        }

        let task_ids: Vec<TaskId> = inner
            .state
            .tasks
            .values()
            .filter(|t| &t.queue_id == id)
            .map(|t| t.id.clone())
            .collect();

        let event = Event::QueueDeleted {
            id: id.clone(),
            task_ids,
            at_ms: self.clock.epoch_ms(),
        };
        self.commit(&mut inner, vec![event])
    }

    // ---- tasks ----

    /// Enqueue a task. The tool name, class, and timeout arrive already
    /// resolved; this checks the queue and assigns the friendly label.
    #[allow(clippy::too_many_arguments)]
    pub fn create_task(
        &self,
        queue_id: &QueueId,
        tool_name: &str,
        task_class: TaskClass,
        payload: serde_json::Value,
        timeout_secs: u64,
        agent_role_key: Option<String>,
    ) -> Result<Task, CoreError> {
        if timeout_secs == 0 {
            return Err(CoreError::Validation("timeout must be a positive number of seconds".into()));
        }

        let mut inner = self.inner.lock();
        let queue = inner
            .state
            .queues
            .get(queue_id.as_str())
            .ok_or_else(|| CoreError::not_found(EntityKind::Queue, queue_id.as_str()))?;
        if !queue.accepts_tasks() {
            return Err(CoreError::precondition("queue is not accepting tasks", queue.status));
        }

        let seq = queue.task_seq + 1;
        let now = self.clock.epoch_ms();
        let task = Task {
            id: TaskId::generate(),
            friendly_id: friendly_label(&queue.name, seq),
            queue_id: queue_id.clone(),
            tool_name: tool_name.to_string(),
            task_class,
            payload,
            status: TaskStatus::Queued,
            timeout_secs,
            attempts: 0,
            agent_role_key: agent_role_key.or_else(|| queue.default_agent_role_key.clone()),
            result_summary: None,
            result_data: None,
            error: None,
            created_at_ms: now,
            updated_at_ms: now,
            claimed_at_ms: None,
            started_at_ms: None,
            finished_at_ms: None,
            stale_warned_at_ms: None,
        };
        let id = task.id.clone();

        let event = Event::TaskEnqueued { task, queue_seq: seq };
        self.commit(&mut inner, vec![event])?;
        materialized(inner.state.tasks.get(id.as_str()))
    }

    pub fn get_task(&self, id: &TaskId) -> Result<Task, CoreError> {
        self.inner
            .lock()
            .state
            .tasks
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| CoreError::not_found(EntityKind::Task, id.as_str()))
    }

    /// Edit payload, timeout, or agent role. Only queued tasks are
    /// editable: running tasks belong to a worker, terminal tasks are
    /// absorbing.
    pub fn update_task(
        &self,
        id: &TaskId,
        payload: Option<serde_json::Value>,
        timeout_secs: Option<u64>,
        agent_role_key: Option<Option<String>>,
    ) -> Result<Task, CoreError> {
        if timeout_secs == Some(0) {
            return Err(CoreError::Validation("timeout must be a positive number of seconds".into()));
        }

        let mut inner = self.inner.lock();
        let task = inner
            .state
            .tasks
            .get(id.as_str())
            .ok_or_else(|| CoreError::not_found(EntityKind::Task, id.as_str()))?;
        if task.status != TaskStatus::Queued {
            return Err(CoreError::precondition("only queued tasks can be edited", task.status));
        }

        let event = Event::TaskUpdated {
            id: id.clone(),
            payload: payload.unwrap_or_else(|| task.payload.clone()),
            timeout_secs: timeout_secs.unwrap_or(task.timeout_secs),
            agent_role_key: agent_role_key.unwrap_or_else(|| task.agent_role_key.clone()),
            at_ms: self.clock.epoch_ms(),
        };
        self.commit(&mut inner, vec![event])?;
        materialized(inner.state.tasks.get(id.as_str()))
    }

    /// Delete is legal in any state and erases the row.
    pub fn delete_task(&self, id: &TaskId) -> Result<(), CoreError> {
        let mut inner = self.inner.lock();
        if !inner.state.tasks.contains_key(id.as_str()) {
            return Err(CoreError::not_found(EntityKind::Task, id.as_str()));
        }
        let event = Event::TaskDeleted { id: id.clone(), at_ms: self.clock.epoch_ms() };
        self.commit(&mut inner, vec![event])
    }

    /// The task `claim` would take next, without advancing anything.
    pub fn peek_oldest_queued(&self, queue_id: &QueueId) -> Result<Option<Task>, CoreError> {
        let inner = self.inner.lock();
        if !inner.state.queues.contains_key(queue_id.as_str()) {
            return Err(CoreError::not_found(EntityKind::Queue, queue_id.as_str()));
        }
        Ok(inner.state.oldest_queued(queue_id).cloned())
    }

    /// Conditional `queued → running`. Exactly one concurrent claimer
    /// wins; the loser gets `Ok(None)` and the task is untouched.
    pub fn atomic_claim(&self, id: &TaskId) -> Result<Option<Task>, CoreError> {
        let mut inner = self.inner.lock();
        let task = inner
            .state
            .tasks
            .get(id.as_str())
            .ok_or_else(|| CoreError::not_found(EntityKind::Task, id.as_str()))?;
        if task.status != TaskStatus::Queued {
            return Ok(None);
        }
        let event = Event::TaskClaimed { id: id.clone(), at_ms: self.clock.epoch_ms() };
        self.commit(&mut inner, vec![event])?;
        Ok(inner.state.tasks.get(id.as_str()).cloned())
    }

    /// `running → succeeded`. Requires a non-empty summary.
    pub fn complete(
        &self,
        id: &TaskId,
        summary: &str,
        data: Option<serde_json::Value>,
    ) -> Result<Task, CoreError> {
        if summary.trim().is_empty() {
            return Err(CoreError::Validation("result summary must not be empty".into()));
        }

        let mut inner = self.inner.lock();
        let task = inner
            .state
            .tasks
            .get(id.as_str())
            .ok_or_else(|| CoreError::not_found(EntityKind::Task, id.as_str()))?;
        if task.status != TaskStatus::Running {
            return Err(CoreError::precondition(
                "cannot complete a task that is not running",
                task.status,
            ));
        }

        let event = Event::TaskCompleted {
            id: id.clone(),
            summary: summary.to_string(),
            data,
            at_ms: self.clock.epoch_ms(),
        };
        self.commit(&mut inner, vec![event])?;
        materialized(inner.state.tasks.get(id.as_str()))
    }

    /// `running → failed`, reported by the executor.
    pub fn fail(&self, id: &TaskId, error: &str) -> Result<Task, CoreError> {
        self.fail_inner(id, error)
    }

    /// `running → failed`, issued by the supervisor. The error text must
    /// identify timeout exceedance as the cause; the supervisor builds it.
    pub fn auto_fail(&self, id: &TaskId, reason: &str) -> Result<Task, CoreError> {
        self.fail_inner(id, reason)
    }

    fn fail_inner(&self, id: &TaskId, error: &str) -> Result<Task, CoreError> {
        let mut inner = self.inner.lock();
        let task = inner
            .state
            .tasks
            .get(id.as_str())
            .ok_or_else(|| CoreError::not_found(EntityKind::Task, id.as_str()))?;
        if task.status != TaskStatus::Running {
            return Err(CoreError::precondition(
                "cannot fail a task that is not running",
                task.status,
            ));
        }

        let event = Event::TaskFailed {
            id: id.clone(),
            error: error.to_string(),
            at_ms: self.clock.epoch_ms(),
        };
        self.commit(&mut inner, vec![event])?;
        materialized(inner.state.tasks.get(id.as_str()))
    }

    /// Record the soft stale warning. Idempotent: returns whether this
    /// call set the mark.
    pub fn mark_stale_warned(&self, id: &TaskId) -> Result<bool, CoreError> {
        let mut inner = self.inner.lock();
        let task = inner
            .state
            .tasks
            .get(id.as_str())
            .ok_or_else(|| CoreError::not_found(EntityKind::Task, id.as_str()))?;
        if task.status != TaskStatus::Running || task.stale_warned_at_ms.is_some() {
            return Ok(false);
        }
        let event = Event::TaskStaleWarned { id: id.clone(), at_ms: self.clock.epoch_ms() };
        self.commit(&mut inner, vec![event])?;
        Ok(true)
    }

    /// Clone a terminal task into a fresh queued one at the tail of its
    /// queue. The source is retained untouched for audit.
    pub fn clone_for_requeue(&self, source_id: &TaskId) -> Result<Task, CoreError> {
        let mut inner = self.inner.lock();
        let source = inner
            .state
            .tasks
            .get(source_id.as_str())
            .ok_or_else(|| CoreError::not_found(EntityKind::Task, source_id.as_str()))?;
        if !source.is_terminal() {
            return Err(CoreError::precondition(
                "only succeeded or failed tasks can be requeued",
                source.status,
            ));
        }

        let queue = inner
            .state
            .queues
            .get(source.queue_id.as_str())
            .ok_or_else(|| CoreError::not_found(EntityKind::Queue, source.queue_id.as_str()))?;
        if !queue.accepts_tasks() {
            return Err(CoreError::precondition("queue is not accepting tasks", queue.status));
        }

        let seq = queue.task_seq + 1;
        let now = self.clock.epoch_ms();
        let task = Task {
            id: TaskId::generate(),
            friendly_id: friendly_label(&queue.name, seq),
            queue_id: source.queue_id.clone(),
            tool_name: source.tool_name.clone(),
            task_class: source.task_class,
            payload: source.payload.clone(),
            status: TaskStatus::Queued,
            timeout_secs: source.timeout_secs,
            attempts: 0,
            agent_role_key: source.agent_role_key.clone(),
            result_summary: None,
            result_data: None,
            error: None,
            created_at_ms: now,
            updated_at_ms: now,
            claimed_at_ms: None,
            started_at_ms: None,
            finished_at_ms: None,
            stale_warned_at_ms: None,
        };
        let id = task.id.clone();

        let event = Event::TaskRequeued { source_id: source_id.clone(), task, queue_seq: seq };
        self.commit(&mut inner, vec![event])?;
        materialized(inner.state.tasks.get(id.as_str()))
    }

    /// Filtered, ordered task listing: `created_at_ms` ascending, ties by
    /// id. Returns the page and the unpaginated total.
    pub fn list_tasks(&self, filter: &TaskFilter) -> TaskPage {
        let now = self.clock.epoch_ms();
        let inner = self.inner.lock();

        let mut tasks: Vec<&Task> = inner
            .state
            .tasks
            .values()
            .filter(|t| filter.queue_id.as_ref().is_none_or(|q| &t.queue_id == q))
            .filter(|t| filter.status.is_none_or(|s| t.status == s))
            .filter(|t| !filter.stale_only || t.is_stale(now))
            .collect();
        tasks.sort_by(|a, b| a.created_at_ms.cmp(&b.created_at_ms).then_with(|| a.id.cmp(&b.id)));

        let total = tasks.len();
        let limit = filter.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        let tasks = tasks.into_iter().skip(filter.offset).take(limit).cloned().collect();
        TaskPage { tasks, total }
    }

    pub fn count_by_status(&self, queue_id: Option<&QueueId>) -> StatusCounts {
        let inner = self.inner.lock();
        let mut counts = StatusCounts::default();
        for task in inner.state.tasks.values() {
            if queue_id.is_some_and(|q| &task.queue_id != q) {
                continue;
            }
            match task.status {
                TaskStatus::Queued => counts.queued += 1,
                TaskStatus::Running => counts.running += 1,
                TaskStatus::Succeeded => counts.succeeded += 1,
                TaskStatus::Failed => counts.failed += 1,
            }
        }
        counts
    }

    /// Queues holding at least one queued task, with their queued counts,
    /// ordered by queue name.
    pub fn queues_with_queued(&self) -> Vec<(Queue, usize)> {
        let inner = self.inner.lock();
        let mut out: Vec<(Queue, usize)> = inner
            .state
            .queues
            .values()
            .filter_map(|queue| {
                let queued = inner
                    .state
                    .tasks
                    .values()
                    .filter(|t| t.queue_id == queue.id && t.status == TaskStatus::Queued)
                    .count();
                (queued > 0).then(|| (queue.clone(), queued))
            })
            .collect();
        out.sort_by(|a, b| a.0.name.cmp(&b.0.name));
        out
    }

    /// Remove terminal tasks finished before `cutoff_ms`. Queued and
    /// running tasks are never purged. Returns the removed ids.
    pub fn purge_terminal_older_than(&self, cutoff_ms: u64) -> Result<Vec<TaskId>, CoreError> {
        let mut inner = self.inner.lock();
        let victims: Vec<TaskId> = inner
            .state
            .tasks
            .values()
            .filter(|t| t.is_terminal() && t.finished_at_ms.is_some_and(|f| f < cutoff_ms))
            .map(|t| t.id.clone())
            .collect();
        if victims.is_empty() {
            return Ok(victims);
        }

        let event = Event::TasksPurged {
            task_ids: victims.clone(),
            cutoff_ms,
            at_ms: self.clock.epoch_ms(),
        };
        self.commit(&mut inner, vec![event])?;
        Ok(victims)
    }

    // ---- maintenance ----

    /// Fsync the WAL, write a snapshot at the current sequence, and drop
    /// the log prefix the snapshot now covers.
    pub fn checkpoint(&self) -> Result<CheckpointSummary, CoreError> {
        let mut inner = self.inner.lock();
        inner.wal.flush().map_err(wal_to_core)?;
        let seq = inner.wal.write_seq();
        write_snapshot(&self.snapshot_path, seq, &inner.state, self.clock.epoch_ms())
            .map_err(|e| CoreError::Internal(e.to_string()))?;
        inner.wal.truncate_before(seq + 1).map_err(wal_to_core)?;
        Ok(CheckpointSummary { seq, tasks: inner.state.tasks.len() })
    }

    pub fn session_count(&self) -> usize {
        self.inner.lock().state.sessions.len()
    }

    pub fn queue_count(&self) -> usize {
        self.inner.lock().state.queues.len()
    }

    pub fn task_count(&self) -> usize {
        self.inner.lock().state.tasks.len()
    }
}

/// A record that was just committed must be present in state; anything
/// else is a bug in an applier, not a caller error.
fn materialized<T: Clone>(record: Option<&T>) -> Result<T, CoreError> {
    record
        .cloned()
        .ok_or_else(|| CoreError::Internal("committed record missing from state".into()))
}

fn wal_to_core(e: WalError) -> CoreError {
    match e {
        WalError::Io(io) => io.into(),
        WalError::Encode(e) => CoreError::Internal(e.to_string()),
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
