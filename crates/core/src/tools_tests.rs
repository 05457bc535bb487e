// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

fn resolver() -> ToolResolver {
    let mut tools = HashMap::new();
    tools.insert(
        "llm-sonnet".to_string(),
        ToolSpec { task_class: Some(TaskClass::LlmHeavy), timeout: None },
    );
    tools.insert(
        "quick-grep".to_string(),
        ToolSpec { task_class: Some(TaskClass::FastScript), timeout: Some(15) },
    );
    tools.insert("unclassified".to_string(), ToolSpec::default());

    let mut class_timeouts = HashMap::new();
    class_timeouts.insert(TaskClass::LlmHeavy, 7200);

    ToolResolver::new(tools, class_timeouts)
}

#[test]
fn enqueue_override_wins() {
    let resolved = resolver().resolve("llm-sonnet", Some(42)).unwrap();
    assert_eq!(resolved.timeout_secs, 42);
    assert_eq!(resolved.task_class, TaskClass::LlmHeavy);
}

#[test]
fn per_tool_timeout_beats_class_default() {
    let resolved = resolver().resolve("quick-grep", None).unwrap();
    assert_eq!(resolved.timeout_secs, 15);
}

#[test]
fn configured_class_timeout_beats_builtin() {
    let resolved = resolver().resolve("llm-sonnet", None).unwrap();
    assert_eq!(resolved.timeout_secs, 7200);
}

#[test]
fn unclassified_tool_falls_back_to_medium_script() {
    let resolved = resolver().resolve("unclassified", None).unwrap();
    assert_eq!(resolved.task_class, TaskClass::MediumScript);
    assert_eq!(resolved.timeout_secs, TaskClass::MediumScript.default_timeout_secs());
}

#[test]
fn unknown_tool_is_validation() {
    let err = resolver().resolve("no-such-tool", None).unwrap_err();
    assert_eq!(err.code(), "validation");
}

#[test]
fn zero_override_is_validation() {
    let err = resolver().resolve("llm-sonnet", Some(0)).unwrap_err();
    assert_eq!(err.code(), "validation");
}

#[parameterized(
    fast = { TaskClass::FastScript, 60 },
    medium = { TaskClass::MediumScript, 300 },
    lite = { TaskClass::LlmLite, 600 },
    heavy = { TaskClass::LlmHeavy, 3600 },
)]
fn builtin_class_defaults(class: TaskClass, secs: u64) {
    assert_eq!(class.default_timeout_secs(), secs);
}

#[test]
fn class_names_serialize_screaming_snake() {
    let json = serde_json::to_string(&TaskClass::FastScript).unwrap();
    assert_eq!(json, "\"FAST_SCRIPT\"");
    let back: TaskClass = serde_json::from_str("\"LLM_HEAVY\"").unwrap();
    assert_eq!(back, TaskClass::LlmHeavy);
}
