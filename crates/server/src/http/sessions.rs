// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session endpoints.

use super::error::{ApiError, ApiResult};
use super::AppState;
use crate::ops;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use sparkq_core::{Clock, SessionId};
use sparkq_wire::{CascadeQuery, CreateSessionRequest, SessionDetail, UpdateSessionRequest};

pub async fn create<C: Clock>(
    State(state): State<AppState<C>>,
    Json(body): Json<CreateSessionRequest>,
) -> ApiResult<SessionDetail> {
    Ok(Json(ops::sessions::create(&state.store, body).await?))
}

pub async fn list<C: Clock>(
    State(state): State<AppState<C>>,
) -> ApiResult<Vec<SessionDetail>> {
    Ok(Json(ops::sessions::list(&state.store).await?))
}

pub async fn update<C: Clock>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateSessionRequest>,
) -> ApiResult<SessionDetail> {
    let id = SessionId::from_string(id);
    Ok(Json(ops::sessions::update(&state.store, id, body).await?))
}

pub async fn delete<C: Clock>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
    Query(query): Query<CascadeQuery>,
) -> Result<StatusCode, ApiError> {
    let id = SessionId::from_string(id);
    ops::sessions::delete(&state.store, id, query.cascade()).await?;
    Ok(StatusCode::NO_CONTENT)
}
