// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queue endpoints.

use super::error::{ApiError, ApiResult};
use super::AppState;
use crate::ops;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use sparkq_core::{Clock, QueueId};
use sparkq_wire::{
    CascadeQuery, CreateQueueRequest, QueueDetail, QueueListQuery, QueueWithQueued,
    UpdateQueueRequest,
};

pub async fn create<C: Clock>(
    State(state): State<AppState<C>>,
    Json(body): Json<CreateQueueRequest>,
) -> ApiResult<QueueDetail> {
    Ok(Json(ops::queues::create(&state.store, body).await?))
}

pub async fn list<C: Clock>(
    State(state): State<AppState<C>>,
    Query(query): Query<QueueListQuery>,
) -> ApiResult<Vec<QueueDetail>> {
    Ok(Json(ops::queues::list(&state.store, query).await?))
}

pub async fn get<C: Clock>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
) -> ApiResult<QueueDetail> {
    Ok(Json(ops::queues::get(&state.store, QueueId::from_string(id)).await?))
}

pub async fn update<C: Clock>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateQueueRequest>,
) -> ApiResult<QueueDetail> {
    Ok(Json(ops::queues::update(&state.store, QueueId::from_string(id), body).await?))
}

pub async fn archive<C: Clock>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
) -> ApiResult<QueueDetail> {
    Ok(Json(ops::queues::archive(&state.store, QueueId::from_string(id)).await?))
}

pub async fn unarchive<C: Clock>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
) -> ApiResult<QueueDetail> {
    Ok(Json(ops::queues::unarchive(&state.store, QueueId::from_string(id)).await?))
}

pub async fn delete<C: Clock>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
    Query(query): Query<CascadeQuery>,
) -> Result<StatusCode, ApiError> {
    ops::queues::delete(&state.store, QueueId::from_string(id), query.cascade()).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn with_queued<C: Clock>(
    State(state): State<AppState<C>>,
) -> ApiResult<Vec<QueueWithQueued>> {
    Ok(Json(ops::queues::with_queued(&state.store).await?))
}
