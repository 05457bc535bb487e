// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TOML configuration. Every key is optional; the defaults run a usable
//! local server out of the box.

use serde::Deserialize;
use sparkq_core::{ProjectSeed, TaskClass, ToolResolver, ToolSpec};
use sparkq_storage::DurabilityMode;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "sparkq.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("failed to parse config {0}: {1}")]
    Parse(PathBuf, #[source] toml::de::Error),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub database: DatabaseSection,
    #[serde(default)]
    pub project: ProjectSection,
    #[serde(default)]
    pub purge: PurgeSection,
    #[serde(default)]
    pub queue_runner: QueueRunnerSection,
    /// Per-class timeout overrides, keyed `FAST_SCRIPT`, `LLM_HEAVY`, …
    #[serde(default)]
    pub task_classes: HashMap<String, TaskClassSection>,
    /// The tool registry: `tools.<name> = { task_class = "...", timeout = … }`.
    #[serde(default)]
    pub tools: HashMap<String, ToolSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseSection {
    /// Data directory holding the WAL, snapshot, and server lock.
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// `durable` (fsync per commit) or `buffered`.
    #[serde(default = "default_db_mode")]
    pub mode: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectSection {
    #[serde(default = "default_project_name")]
    pub name: String,
    #[serde(default = "default_repo_path")]
    pub repo_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PurgeSection {
    /// Terminal tasks older than this are purged.
    #[serde(default = "default_retention_days")]
    pub older_than_days: u64,
    #[serde(default = "default_purge_interval_hours")]
    pub interval_hours: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueueRunnerSection {
    /// Runner watch-mode sleep between polls, in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
    /// Supervisor stale-loop period, in seconds.
    #[serde(default = "default_auto_fail_interval")]
    pub auto_fail_interval_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskClassSection {
    pub timeout: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8643
}
fn default_data_path() -> PathBuf {
    PathBuf::from("sparkq-data")
}
fn default_db_mode() -> String {
    "durable".to_string()
}
fn default_project_name() -> String {
    "sparkq".to_string()
}
fn default_repo_path() -> PathBuf {
    PathBuf::from(".")
}
fn default_retention_days() -> u64 {
    14
}
fn default_purge_interval_hours() -> u64 {
    6
}
fn default_poll_interval() -> u64 {
    5
}
fn default_auto_fail_interval() -> u64 {
    60
}

impl Default for ServerSection {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self { path: default_data_path(), mode: default_db_mode() }
    }
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self { name: default_project_name(), repo_path: default_repo_path() }
    }
}

impl Default for PurgeSection {
    fn default() -> Self {
        Self {
            older_than_days: default_retention_days(),
            interval_hours: default_purge_interval_hours(),
        }
    }
}

impl Default for QueueRunnerSection {
    fn default() -> Self {
        Self {
            poll_interval: default_poll_interval(),
            auto_fail_interval_seconds: default_auto_fail_interval(),
        }
    }
}

impl Config {
    /// Load from an explicit path, or from `sparkq.toml` in the working
    /// directory if present, or fall back to pure defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let text =
            std::fs::read_to_string(&path).map_err(|e| ConfigError::Io(path.clone(), e))?;
        Self::parse(&text).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.clone(), inner),
            other => other,
        })
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(PathBuf::from(CONFIG_FILE), e))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn server_url(&self) -> String {
        format!("http://{}", self.bind_addr())
    }

    pub fn data_dir(&self) -> &Path {
        &self.database.path
    }

    pub fn durability_mode(&self) -> Result<DurabilityMode, ConfigError> {
        self.database.mode.parse().map_err(ConfigError::Invalid)
    }

    pub fn project_seed(&self) -> ProjectSeed {
        ProjectSeed {
            name: self.project.name.clone(),
            repo_path: self.project.repo_path.clone(),
        }
    }

    /// The tool registry as a pure resolver. Fails on an unrecognized
    /// class name rather than silently dropping the override.
    pub fn tool_resolver(&self) -> Result<ToolResolver, ConfigError> {
        let mut class_timeouts = HashMap::new();
        for (name, section) in &self.task_classes {
            let class: TaskClass = name
                .parse()
                .map_err(|e: String| ConfigError::Invalid(format!("task_classes: {e}")))?;
            class_timeouts.insert(class, section.timeout);
        }
        Ok(ToolResolver::new(self.tools.clone(), class_timeouts))
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.purge.older_than_days * 24 * 3600)
    }

    pub fn purge_interval(&self) -> Duration {
        Duration::from_secs(self.purge.interval_hours * 3600)
    }

    pub fn stale_interval(&self) -> Duration {
        Duration::from_secs(self.queue_runner.auto_fail_interval_seconds)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.queue_runner.poll_interval)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
