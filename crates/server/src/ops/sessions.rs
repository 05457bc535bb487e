// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session operations.

use super::with_retry;
use sparkq_core::{Clock, CoreError, SessionId};
use sparkq_storage::Store;
use sparkq_wire::{CreateSessionRequest, SessionDetail, UpdateSessionRequest};

pub async fn create<C: Clock>(
    store: &Store<C>,
    body: CreateSessionRequest,
) -> Result<SessionDetail, CoreError> {
    let session =
        with_retry(|| store.create_session(&body.name, &body.description)).await?;
    Ok(session.into())
}

pub async fn list<C: Clock>(store: &Store<C>) -> Result<Vec<SessionDetail>, CoreError> {
    Ok(store.list_sessions().into_iter().map(Into::into).collect())
}

/// Rename and/or end, in that order, per the request body.
pub async fn update<C: Clock>(
    store: &Store<C>,
    id: SessionId,
    body: UpdateSessionRequest,
) -> Result<SessionDetail, CoreError> {
    if body.ended == Some(false) {
        return Err(CoreError::Validation("sessions cannot be reopened".into()));
    }

    if let Some(name) = &body.name {
        with_retry(|| store.rename_session(&id, name)).await?;
    }
    if body.ended == Some(true) {
        with_retry(|| store.end_session(&id)).await?;
    }

    Ok(store.get_session(&id)?.into())
}

pub async fn delete<C: Clock>(
    store: &Store<C>,
    id: SessionId,
    cascade: bool,
) -> Result<(), CoreError> {
    with_retry(|| store.delete_session(&id, cascade)).await
}
