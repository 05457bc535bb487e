// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queue operations.

use super::with_retry;
use sparkq_core::{Clock, CoreError, QueueId};
use sparkq_storage::{QueuePatch, Store};
use sparkq_wire::{
    CreateQueueRequest, QueueDetail, QueueListQuery, QueueWithQueued, UpdateQueueRequest,
};

pub async fn create<C: Clock>(
    store: &Store<C>,
    body: CreateQueueRequest,
) -> Result<QueueDetail, CoreError> {
    let queue = with_retry(|| {
        store.create_queue(
            &body.session_id,
            &body.name,
            &body.instructions,
            body.default_agent_role_key.clone(),
        )
    })
    .await?;
    Ok(queue.into())
}

pub async fn list<C: Clock>(
    store: &Store<C>,
    query: QueueListQuery,
) -> Result<Vec<QueueDetail>, CoreError> {
    Ok(store
        .list_queues(query.session_id.as_ref(), query.name.as_deref())
        .into_iter()
        .map(Into::into)
        .collect())
}

pub async fn get<C: Clock>(store: &Store<C>, id: QueueId) -> Result<QueueDetail, CoreError> {
    Ok(store.get_queue(&id)?.into())
}

/// Apply the mutable-field patch. The `archived` flag routes through the
/// archive operations so its semantics stay in one place; an empty string
/// clears an optional key.
pub async fn update<C: Clock>(
    store: &Store<C>,
    id: QueueId,
    body: UpdateQueueRequest,
) -> Result<QueueDetail, CoreError> {
    match body.archived {
        Some(true) => {
            with_retry(|| store.archive_queue(&id)).await?;
        }
        Some(false) => {
            with_retry(|| store.unarchive_queue(&id)).await?;
        }
        None => {}
    }

    let patch = QueuePatch {
        name: body.name.clone(),
        instructions: body.instructions.clone(),
        status: body.status,
        default_agent_role_key: body.default_agent_role_key.clone().map(clear_on_empty),
        codex_session_id: body.codex_session_id.clone().map(clear_on_empty),
    };

    if patch.name.is_none()
        && patch.instructions.is_none()
        && patch.status.is_none()
        && patch.default_agent_role_key.is_none()
        && patch.codex_session_id.is_none()
    {
        return Ok(store.get_queue(&id)?.into());
    }

    let queue = with_retry(|| store.update_queue(&id, patch.clone())).await?;
    Ok(queue.into())
}

fn clear_on_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

pub async fn archive<C: Clock>(store: &Store<C>, id: QueueId) -> Result<QueueDetail, CoreError> {
    Ok(with_retry(|| store.archive_queue(&id)).await?.into())
}

pub async fn unarchive<C: Clock>(
    store: &Store<C>,
    id: QueueId,
) -> Result<QueueDetail, CoreError> {
    Ok(with_retry(|| store.unarchive_queue(&id)).await?.into())
}

pub async fn delete<C: Clock>(
    store: &Store<C>,
    id: QueueId,
    cascade: bool,
) -> Result<(), CoreError> {
    with_retry(|| store.delete_queue(&id, cascade)).await
}

/// Queues with at least one queued task, for runner dashboards.
pub async fn with_queued<C: Clock>(store: &Store<C>) -> Result<Vec<QueueWithQueued>, CoreError> {
    Ok(store
        .queues_with_queued()
        .into_iter()
        .map(|(queue, queued_count)| QueueWithQueued { queue: queue.into(), queued_count })
        .collect())
}
