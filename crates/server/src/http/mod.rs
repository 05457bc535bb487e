// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The local HTTP control surface.
//!
//! A thin axum layer over [`crate::ops`]: extract, delegate, serialize.
//! No authentication and no TLS: the server binds loopback and trusts
//! its single user.

mod error;
mod meta;
mod queues;
mod sessions;
mod tasks;

pub use error::{ApiError, ApiResult};

use axum::routing::{get, post, put};
use axum::Router;
use sparkq_core::{Clock, ToolResolver};
use sparkq_storage::Store;
use std::sync::Arc;

/// Shared handler state.
pub struct AppState<C: Clock> {
    pub store: Arc<Store<C>>,
    pub resolver: Arc<ToolResolver>,
}

impl<C: Clock> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store), resolver: Arc::clone(&self.resolver) }
    }
}

/// Build the full route table over the given state.
pub fn router<C: Clock>(state: AppState<C>) -> Router {
    Router::new()
        .route("/health", get(meta::health))
        .route("/api/version", get(meta::version))
        .route("/api/sessions", post(sessions::create).get(sessions::list))
        .route("/api/sessions/{id}", put(sessions::update).delete(sessions::delete))
        .route("/api/queues", post(queues::create).get(queues::list))
        .route("/api/queues/with-queued", get(queues::with_queued))
        .route(
            "/api/queues/{id}",
            get(queues::get).put(queues::update).delete(queues::delete),
        )
        .route("/api/queues/{id}/archive", put(queues::archive))
        .route("/api/queues/{id}/unarchive", put(queues::unarchive))
        .route("/api/tasks", post(tasks::enqueue).get(tasks::list))
        .route(
            "/api/tasks/{id}",
            get(tasks::get).put(tasks::update).delete(tasks::delete),
        )
        .route("/api/tasks/{id}/claim", post(tasks::claim))
        .route("/api/tasks/{id}/complete", post(tasks::complete))
        .route("/api/tasks/{id}/fail", post(tasks::fail))
        .route("/api/tasks/{id}/requeue", post(tasks::requeue))
        .with_state(state)
}
