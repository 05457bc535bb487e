// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task endpoints: enqueue through requeue.

use super::error::{ApiError, ApiResult};
use super::AppState;
use crate::ops;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use sparkq_core::{Clock, TaskId};
use sparkq_wire::{
    ClaimDescriptor, CompleteRequest, EnqueueRequest, FailRequest, TaskDetail, TaskListQuery,
    TaskPage, UpdateTaskRequest,
};

pub async fn enqueue<C: Clock>(
    State(state): State<AppState<C>>,
    Json(body): Json<EnqueueRequest>,
) -> ApiResult<TaskDetail> {
    Ok(Json(ops::tasks::enqueue(&state.store, &state.resolver, body).await?))
}

pub async fn list<C: Clock>(
    State(state): State<AppState<C>>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<TaskPage> {
    Ok(Json(ops::tasks::list(&state.store, query).await?))
}

pub async fn get<C: Clock>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
) -> ApiResult<TaskDetail> {
    Ok(Json(ops::tasks::get(&state.store, TaskId::from_string(id)).await?))
}

pub async fn update<C: Clock>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateTaskRequest>,
) -> ApiResult<TaskDetail> {
    Ok(Json(ops::tasks::update(&state.store, TaskId::from_string(id), body).await?))
}

pub async fn delete<C: Clock>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ops::tasks::delete(&state.store, TaskId::from_string(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn claim<C: Clock>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
) -> ApiResult<ClaimDescriptor> {
    Ok(Json(ops::tasks::claim(&state.store, TaskId::from_string(id)).await?))
}

pub async fn complete<C: Clock>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
    Json(body): Json<CompleteRequest>,
) -> ApiResult<TaskDetail> {
    Ok(Json(ops::tasks::complete(&state.store, TaskId::from_string(id), body).await?))
}

pub async fn fail<C: Clock>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
    Json(body): Json<FailRequest>,
) -> ApiResult<TaskDetail> {
    Ok(Json(ops::tasks::fail(&state.store, TaskId::from_string(id), body).await?))
}

pub async fn requeue<C: Clock>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
) -> ApiResult<TaskDetail> {
    Ok(Json(ops::tasks::requeue(&state.store, TaskId::from_string(id)).await?))
}
