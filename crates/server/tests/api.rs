// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end tests against the HTTP surface: real store, real router,
//! real sockets on an ephemeral port.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use reqwest::StatusCode;
use serde_json::{json, Value};
use sparkq_core::{ProjectSeed, SystemClock, TaskClass, ToolResolver, ToolSpec};
use sparkq_server::http::{self, AppState};
use sparkq_storage::{DurabilityMode, Store, StoreOptions};
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;

struct TestServer {
    base: String,
    client: reqwest::Client,
    // Keeps the data directory alive for the duration of the test.
    _dir: TempDir,
}

impl TestServer {
    async fn spawn() -> Self {
        let dir = TempDir::new().unwrap();
        let store = Store::open(
            dir.path(),
            StoreOptions {
                mode: DurabilityMode::Durable,
                project: ProjectSeed { name: "sparkq".into(), repo_path: ".".into() },
            },
            SystemClock,
        )
        .unwrap();

        let mut tools = HashMap::new();
        tools.insert(
            "llm-sonnet".to_string(),
            ToolSpec { task_class: Some(TaskClass::LlmHeavy), timeout: None },
        );
        let resolver = ToolResolver::new(tools, HashMap::new());

        let app = http::router(AppState {
            store: Arc::new(store),
            resolver: Arc::new(resolver),
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { base: format!("http://{addr}"), client: reqwest::Client::new(), _dir: dir }
    }

    async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.base, path))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    async fn put(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .put(format!("{}{}", self.base, path))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(format!("{}{}", self.base, path)).send().await.unwrap()
    }

    /// Session + queue fixture; returns (session_id, queue_id).
    async fn seed_queue(&self, queue_name: &str) -> (String, String) {
        let session: Value = self
            .post("/api/sessions", json!({"name": "sess1"}))
            .await
            .json()
            .await
            .unwrap();
        let session_id = session["id"].as_str().unwrap().to_string();

        let queue: Value = self
            .post(
                "/api/queues",
                json!({"session_id": session_id, "name": queue_name, "instructions": "Do X"}),
            )
            .await
            .json()
            .await
            .unwrap();
        (session_id, queue["id"].as_str().unwrap().to_string())
    }

    async fn enqueue(&self, queue_id: &str) -> Value {
        let response = self
            .post(
                "/api/tasks",
                json!({
                    "queue_id": queue_id,
                    "tool_name": "llm-sonnet",
                    "payload": {"prompt": "hello"},
                    "timeout": 60,
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        response.json().await.unwrap()
    }
}

#[tokio::test]
async fn health_and_version() {
    let server = TestServer::spawn().await;

    let health: Value = server.get("/health").await.json().await.unwrap();
    assert_eq!(health["status"], "ok");

    let version: Value = server.get("/api/version").await.json().await.unwrap();
    assert!(version["version"].as_str().is_some());
    assert!(version["git_hash"].as_str().is_some());
}

#[tokio::test]
async fn happy_path_over_http() {
    let server = TestServer::spawn().await;
    let (_, queue_id) = server.seed_queue("Q1").await;

    let task = server.enqueue(&queue_id).await;
    let task_id = task["id"].as_str().unwrap();
    assert_eq!(task["status"], "queued");
    assert_eq!(task["friendly_id"], "Q1-1");
    assert_eq!(task["timeout"], 60);

    // Peek: the queued listing in claim order.
    let peek: Value = server
        .get(&format!("/api/tasks?queue_id={queue_id}&status=queued&limit=1"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(peek["total"], 1);
    assert_eq!(peek["tasks"][0]["id"], *task_id);

    // Claim returns the full descriptor.
    let claim = server.post(&format!("/api/tasks/{task_id}/claim"), json!({})).await;
    assert_eq!(claim.status(), StatusCode::OK);
    let descriptor: Value = claim.json().await.unwrap();
    assert_eq!(descriptor["status"], "running");
    assert_eq!(descriptor["attempts"], 1);
    assert_eq!(descriptor["queue"]["name"], "Q1");
    assert_eq!(descriptor["queue"]["instructions"], "Do X");
    assert_eq!(descriptor["payload"]["prompt"], "hello");

    // Complete; a second completion hits the absorbing terminal state.
    let done = server
        .post(&format!("/api/tasks/{task_id}/complete"), json!({"result_summary": "done"}))
        .await;
    assert_eq!(done.status(), StatusCode::OK);

    let again = server
        .post(&format!("/api/tasks/{task_id}/complete"), json!({"result_summary": "again"}))
        .await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
    let body: Value = again.json().await.unwrap();
    assert_eq!(body["error"]["code"], "precondition");

    let listing: Value = server
        .get("/api/tasks?status=succeeded")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(listing["total"], 1);
    assert_eq!(listing["tasks"][0]["result_summary"], "done");
}

#[tokio::test]
async fn empty_summary_is_rejected_over_http() {
    let server = TestServer::spawn().await;
    let (_, queue_id) = server.seed_queue("Q2").await;
    let task = server.enqueue(&queue_id).await;
    let task_id = task["id"].as_str().unwrap();
    server.post(&format!("/api/tasks/{task_id}/claim"), json!({})).await;

    let response = server
        .post(&format!("/api/tasks/{task_id}/complete"), json!({"result_summary": ""}))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "validation");

    let task: Value = server.get(&format!("/api/tasks/{task_id}")).await.json().await.unwrap();
    assert_eq!(task["status"], "running");
}

#[tokio::test]
async fn lost_claim_is_a_distinguishable_conflict() {
    let server = TestServer::spawn().await;
    let (_, queue_id) = server.seed_queue("Q3").await;
    let task = server.enqueue(&queue_id).await;
    let task_id = task["id"].as_str().unwrap();

    let first = server.post(&format!("/api/tasks/{task_id}/claim"), json!({})).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = server.post(&format!("/api/tasks/{task_id}/claim"), json!({})).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body: Value = second.json().await.unwrap();
    // The conflict marker the runner keys on, distinct from precondition.
    assert_eq!(body["error"]["code"], "conflict");
}

#[tokio::test]
async fn requeue_clones_a_failed_task() {
    let server = TestServer::spawn().await;
    let (_, queue_id) = server.seed_queue("Q4").await;
    let task = server.enqueue(&queue_id).await;
    let task_id = task["id"].as_str().unwrap();

    server.post(&format!("/api/tasks/{task_id}/claim"), json!({})).await;
    let failed = server
        .post(&format!("/api/tasks/{task_id}/fail"), json!({"error_message": "denied"}))
        .await;
    assert_eq!(failed.status(), StatusCode::OK);

    let requeue = server.post(&format!("/api/tasks/{task_id}/requeue"), json!({})).await;
    assert_eq!(requeue.status(), StatusCode::OK);
    let clone: Value = requeue.json().await.unwrap();
    assert_ne!(clone["id"], *task_id);
    assert_eq!(clone["status"], "queued");
    assert_eq!(clone["attempts"], 0);
    assert_eq!(clone["payload"]["prompt"], "hello");

    let original: Value =
        server.get(&format!("/api/tasks/{task_id}")).await.json().await.unwrap();
    assert_eq!(original["status"], "failed");
    assert_eq!(original["error"], "denied");
}

#[tokio::test]
async fn queue_name_filter_and_queued_rollup() {
    let server = TestServer::spawn().await;
    let (_, queue_id) = server.seed_queue("Back End").await;
    server.enqueue(&queue_id).await;
    server.enqueue(&queue_id).await;

    let by_name: Value = server.get("/api/queues?name=Back%20End").await.json().await.unwrap();
    assert_eq!(by_name.as_array().unwrap().len(), 1);
    assert_eq!(by_name[0]["id"].as_str().unwrap(), queue_id);

    let none: Value = server.get("/api/queues?name=back%20end").await.json().await.unwrap();
    assert!(none.as_array().unwrap().is_empty());

    let rollup: Value = server.get("/api/queues/with-queued").await.json().await.unwrap();
    assert_eq!(rollup.as_array().unwrap().len(), 1);
    assert_eq!(rollup[0]["queue"]["name"], "Back End");
    assert_eq!(rollup[0]["queued_count"], 2);
}

#[tokio::test]
async fn error_codes_map_to_statuses() {
    let server = TestServer::spawn().await;
    let (_, queue_id) = server.seed_queue("Q5").await;

    // Unknown task: 404.
    let response = server.get("/api/tasks/tsk-missing").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "not_found");

    // Unknown tool: 400.
    let response = server
        .post("/api/tasks", json!({"queue_id": queue_id, "tool_name": "nope"}))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Archived queue refuses enqueues: 409.
    let archived = server.put(&format!("/api/queues/{queue_id}/archive"), json!({})).await;
    assert_eq!(archived.status(), StatusCode::OK);
    let response = server
        .post(
            "/api/tasks",
            json!({"queue_id": queue_id, "tool_name": "llm-sonnet"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "precondition");

    // Unarchive restores it.
    server.put(&format!("/api/queues/{queue_id}/unarchive"), json!({})).await;
    let response = server
        .post(
            "/api/tasks",
            json!({"queue_id": queue_id, "tool_name": "llm-sonnet"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn session_lifecycle_over_http() {
    let server = TestServer::spawn().await;
    let (session_id, queue_id) = server.seed_queue("Q6").await;

    let renamed: Value = server
        .put(&format!("/api/sessions/{session_id}"), json!({"name": "sprint 12"}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(renamed["name"], "sprint 12");

    let ended: Value = server
        .put(&format!("/api/sessions/{session_id}"), json!({"ended": true}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(ended["status"], "ended");
    assert!(ended["ended_at"].as_u64().is_some());

    // Delete without cascade is rejected while the queue exists.
    let response = server
        .client
        .delete(format!("{}/api/sessions/{session_id}", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = server
        .client
        .delete(format!("{}/api/sessions/{session_id}?cascade=true", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = server.get(&format!("/api/queues/{queue_id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
