// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[test]
fn enqueue_defaults_are_permissive() {
    let body: EnqueueRequest = serde_json::from_str(
        r#"{"queue_id": "que-abc", "tool_name": "llm-sonnet"}"#,
    )
    .unwrap();
    assert_eq!(body.payload, serde_json::Value::Null);
    assert_eq!(body.timeout, None);
    assert_eq!(body.agent_role_key, None);
}

#[test]
fn task_list_query_parses_status_and_flags() {
    let query: TaskListQuery = serde_json::from_str(
        r#"{"queue_id": "que-abc", "status": "queued", "stale": true, "limit": 1}"#,
    )
    .unwrap();
    assert_eq!(query.status, Some(sparkq_core::TaskStatus::Queued));
    assert_eq!(query.stale, Some(true));
    assert_eq!(query.limit, Some(1));
    assert_eq!(query.offset, None);
}

#[test]
fn update_session_empty_body_is_noop() {
    let body: UpdateSessionRequest = serde_json::from_str("{}").unwrap();
    assert!(body.name.is_none());
    assert!(body.ended.is_none());
}

#[parameterized(
    typed = { Some("timeout".to_string()), "timeout: executor never reported back" },
    untyped = { None, "executor never reported back" },
    empty_type = { Some(String::new()), "executor never reported back" },
)]
fn fail_request_error_text(error_type: Option<String>, expected: &str) {
    let body = FailRequest {
        error_message: "executor never reported back".into(),
        error_type,
    };
    assert_eq!(body.error_text(), expected);
}

#[test]
fn cascade_defaults_to_false() {
    let query: CascadeQuery = serde_json::from_str("{}").unwrap();
    assert!(!query.cascade());
    let query: CascadeQuery = serde_json::from_str(r#"{"cascade": true}"#).unwrap();
    assert!(query.cascade());
}
