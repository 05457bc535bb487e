// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Classified errors → HTTP statuses with a machine-readable body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use sparkq_core::CoreError;
use sparkq_wire::ErrorBody;

pub type ApiResult<T> = Result<Json<T>, ApiError>;

/// Wrapper giving [`CoreError`] an HTTP rendering.
pub struct ApiError(pub CoreError);

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            // Conflict keeps its own `code` in the body so the runner can
            // tell a lost claim from a precondition failure.
            CoreError::Precondition { .. } | CoreError::Conflict(_) => StatusCode::CONFLICT,
            CoreError::Validation(_) => StatusCode::BAD_REQUEST,
            CoreError::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
            CoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "internal error on request");
        }

        (status, Json(ErrorBody::from_core(&self.0))).into_response()
    }
}
