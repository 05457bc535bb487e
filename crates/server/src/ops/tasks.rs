// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task operations: the state-machine surface.

use super::with_retry;
use sparkq_core::{Clock, CoreError, TaskId, ToolResolver};
use sparkq_storage::{Store, TaskFilter};
use sparkq_wire::{
    ClaimDescriptor, CompleteRequest, EnqueueRequest, FailRequest, TaskDetail, TaskListQuery,
    TaskPage, UpdateTaskRequest,
};

const DEFAULT_PAGE_LIMIT: usize = 100;

/// Enqueue: resolve the tool to its class and effective timeout, then
/// insert a queued task at the tail of the queue.
pub async fn enqueue<C: Clock>(
    store: &Store<C>,
    resolver: &ToolResolver,
    body: EnqueueRequest,
) -> Result<TaskDetail, CoreError> {
    let resolved = resolver.resolve(&body.tool_name, body.timeout)?;
    let task = with_retry(|| {
        store.create_task(
            &body.queue_id,
            &body.tool_name,
            resolved.task_class,
            body.payload.clone(),
            resolved.timeout_secs,
            body.agent_role_key.clone(),
        )
    })
    .await?;
    Ok(task.into())
}

pub async fn list<C: Clock>(
    store: &Store<C>,
    query: TaskListQuery,
) -> Result<TaskPage, CoreError> {
    let filter = TaskFilter {
        queue_id: query.queue_id,
        status: query.status,
        stale_only: query.stale.unwrap_or(false),
        offset: query.offset.unwrap_or(0),
        limit: query.limit,
    };
    let page = store.list_tasks(&filter);
    Ok(TaskPage {
        tasks: page.tasks.into_iter().map(Into::into).collect(),
        total: page.total,
        offset: filter.offset,
        limit: filter.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
    })
}

pub async fn get<C: Clock>(store: &Store<C>, id: TaskId) -> Result<TaskDetail, CoreError> {
    Ok(store.get_task(&id)?.into())
}

pub async fn update<C: Clock>(
    store: &Store<C>,
    id: TaskId,
    body: UpdateTaskRequest,
) -> Result<TaskDetail, CoreError> {
    let task = with_retry(|| {
        store.update_task(
            &id,
            body.payload.clone(),
            body.timeout,
            body.agent_role_key.clone().map(Some),
        )
    })
    .await?;
    Ok(task.into())
}

pub async fn delete<C: Clock>(store: &Store<C>, id: TaskId) -> Result<(), CoreError> {
    with_retry(|| store.delete_task(&id)).await
}

/// Atomic claim. A lost race is a `Conflict`: the runner's signal to
/// skip and re-poll, distinct from every fatal kind.
pub async fn claim<C: Clock>(store: &Store<C>, id: TaskId) -> Result<ClaimDescriptor, CoreError> {
    let task = with_retry(|| store.atomic_claim(&id))
        .await?
        .ok_or_else(|| CoreError::Conflict(format!("task {id} is no longer queued")))?;
    let queue = store.get_queue(&task.queue_id)?;
    Ok(ClaimDescriptor::new(task, &queue))
}

pub async fn complete<C: Clock>(
    store: &Store<C>,
    id: TaskId,
    body: CompleteRequest,
) -> Result<TaskDetail, CoreError> {
    let task = with_retry(|| {
        store.complete(&id, &body.result_summary, body.result_data.clone())
    })
    .await?;
    Ok(task.into())
}

pub async fn fail<C: Clock>(
    store: &Store<C>,
    id: TaskId,
    body: FailRequest,
) -> Result<TaskDetail, CoreError> {
    let error = body.error_text();
    let task = with_retry(|| store.fail(&id, &error)).await?;
    Ok(task.into())
}

/// Clone-requeue a terminal task; the original is untouched.
pub async fn requeue<C: Clock>(store: &Store<C>, id: TaskId) -> Result<TaskDetail, CoreError> {
    let task = with_retry(|| store.clone_for_requeue(&id)).await?;
    Ok(task.into())
}
