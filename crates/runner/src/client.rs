// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for the server's control surface.
//!
//! The polling loop talks to a [`ControlClient`] trait so tests can
//! script responses; [`HttpControlClient`] is the real reqwest-backed
//! implementation.

use async_trait::async_trait;
use sparkq_core::{QueueId, TaskId};
use sparkq_wire::{ClaimDescriptor, ErrorBody, QueueDetail, TaskDetail, TaskPage};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a classified error body.
    #[error("server error ({status}): {code}: {message}")]
    Api { status: u16, code: String, message: String },
    /// Transport-level failure (connection refused, timeout, bad JSON).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    /// A lost claim race. The runner skips the task and re-polls; every
    /// other error is fatal for the tick.
    pub fn is_conflict(&self) -> bool {
        matches!(self, ClientError::Api { code, .. } if code == "conflict")
    }
}

/// The three calls the polling loop needs.
#[async_trait]
pub trait ControlClient: Send + Sync {
    /// Resolve a queue by its globally unique name.
    async fn queue_by_name(&self, name: &str) -> Result<Option<QueueDetail>, ClientError>;

    /// The task `claim` would take next, or None when the queue is empty.
    async fn peek(&self, queue_id: &QueueId) -> Result<Option<TaskDetail>, ClientError>;

    /// Atomically claim a specific task.
    async fn claim(&self, task_id: &TaskId) -> Result<ClaimDescriptor, ClientError>;
}

pub struct HttpControlClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpControlClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client: reqwest::Client::new() }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Decode a non-success response into the classified API error.
async fn api_error(response: reqwest::Response) -> ClientError {
    let status = response.status().as_u16();
    match response.json::<ErrorBody>().await {
        Ok(body) => ClientError::Api {
            status,
            code: body.error.code,
            message: body.error.message,
        },
        Err(e) => ClientError::Http(e),
    }
}

#[async_trait]
impl ControlClient for HttpControlClient {
    async fn queue_by_name(&self, name: &str) -> Result<Option<QueueDetail>, ClientError> {
        let response = self
            .client
            .get(self.url("/api/queues"))
            .query(&[("name", name)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        let queues: Vec<QueueDetail> = response.json().await?;
        Ok(queues.into_iter().next())
    }

    async fn peek(&self, queue_id: &QueueId) -> Result<Option<TaskDetail>, ClientError> {
        let response = self
            .client
            .get(self.url("/api/tasks"))
            .query(&[
                ("queue_id", queue_id.as_str()),
                ("status", "queued"),
                ("limit", "1"),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        let page: TaskPage = response.json().await?;
        Ok(page.tasks.into_iter().next())
    }

    async fn claim(&self, task_id: &TaskId) -> Result<ClaimDescriptor, ClientError> {
        let response = self
            .client
            .post(self.url(&format!("/api/tasks/{task_id}/claim")))
            .json(&serde_json::json!({}))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
