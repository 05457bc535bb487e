// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sparkq_storage::DurabilityMode as Mode;
use yare::parameterized;

#[test]
fn empty_config_has_working_defaults() {
    let config = Config::parse("").unwrap();
    assert_eq!(config.bind_addr(), "127.0.0.1:8643");
    assert_eq!(config.database.mode, "durable");
    assert_eq!(config.purge.older_than_days, 14);
    assert_eq!(config.queue_runner.poll_interval, 5);
    assert_eq!(config.queue_runner.auto_fail_interval_seconds, 60);
    assert_eq!(config.durability_mode().unwrap(), Mode::Durable);
}

#[test]
fn full_config_parses() {
    let config = Config::parse(
        r#"
        [server]
        host = "0.0.0.0"
        port = 9000

        [database]
        path = "/var/lib/sparkq"
        mode = "buffered"

        [project]
        name = "my-project"
        repo_path = "/src/my-project"

        [purge]
        older_than_days = 3
        interval_hours = 1

        [queue_runner]
        poll_interval = 2
        auto_fail_interval_seconds = 30

        [task_classes.LLM_HEAVY]
        timeout = 7200

        [tools.llm-sonnet]
        task_class = "LLM_HEAVY"

        [tools.quick-grep]
        task_class = "FAST_SCRIPT"
        timeout = 15
        "#,
    )
    .unwrap();

    assert_eq!(config.bind_addr(), "0.0.0.0:9000");
    assert_eq!(config.durability_mode().unwrap(), Mode::Buffered);
    assert_eq!(config.retention(), Duration::from_secs(3 * 24 * 3600));
    assert_eq!(config.stale_interval(), Duration::from_secs(30));

    let resolver = config.tool_resolver().unwrap();
    assert_eq!(resolver.resolve("llm-sonnet", None).unwrap().timeout_secs, 7200);
    assert_eq!(resolver.resolve("quick-grep", None).unwrap().timeout_secs, 15);
    assert_eq!(resolver.resolve("quick-grep", Some(99)).unwrap().timeout_secs, 99);
}

#[test]
fn unknown_task_class_name_is_invalid() {
    let config = Config::parse("[task_classes.TURBO]\ntimeout = 5").unwrap();
    let err = config.tool_resolver().unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[parameterized(
    durable = { "durable", Some(Mode::Durable) },
    buffered = { "buffered", Some(Mode::Buffered) },
    unknown = { "wal2", None },
    cased = { "Durable", None },
)]
fn database_mode_parsing(mode: &str, expected: Option<Mode>) {
    let config = Config::parse(&format!("[database]\nmode = \"{mode}\"")).unwrap();
    match expected {
        Some(expected) => assert_eq!(config.durability_mode().unwrap(), expected),
        None => assert!(config.durability_mode().is_err()),
    }
}

#[test]
fn unknown_keys_are_rejected() {
    let err = Config::parse("[server]\nhosts = \"oops\"").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(..)));
}

#[test]
fn missing_file_falls_back_to_defaults() {
    // No sparkq.toml in a scratch cwd-independent load.
    let config = Config::load(None);
    // Either the repo has no config file (defaults) or parsing succeeded;
    // both are fine, the call must not error.
    assert!(config.is_ok());
}

#[test]
fn explicit_missing_file_is_io_error() {
    let err = Config::load(Some(Path::new("/nonexistent/sparkq.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::Io(..)));
}
