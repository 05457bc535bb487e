// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tool registry lookup: tool name → task class → effective timeout.
//!
//! The resolver is built once from configuration and is pure afterwards.
//! The core never executes tools; it only needs the class (recorded on the
//! task) and the timeout (fed to the stale supervisor).

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Named timeout bucket for a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskClass {
    FastScript,
    MediumScript,
    LlmLite,
    LlmHeavy,
}

crate::simple_display! {
    TaskClass {
        FastScript => "FAST_SCRIPT",
        MediumScript => "MEDIUM_SCRIPT",
        LlmLite => "LLM_LITE",
        LlmHeavy => "LLM_HEAVY",
    }
}

impl TaskClass {
    /// Built-in default timeout, overridable per class in configuration.
    pub fn default_timeout_secs(self) -> u64 {
        match self {
            TaskClass::FastScript => 60,
            TaskClass::MediumScript => 300,
            TaskClass::LlmLite => 600,
            TaskClass::LlmHeavy => 3600,
        }
    }

    pub const ALL: [TaskClass; 4] = [
        TaskClass::FastScript,
        TaskClass::MediumScript,
        TaskClass::LlmLite,
        TaskClass::LlmHeavy,
    ];
}

impl std::str::FromStr for TaskClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FAST_SCRIPT" => Ok(TaskClass::FastScript),
            "MEDIUM_SCRIPT" => Ok(TaskClass::MediumScript),
            "LLM_LITE" => Ok(TaskClass::LlmLite),
            "LLM_HEAVY" => Ok(TaskClass::LlmHeavy),
            other => Err(format!("unknown task class: {other}")),
        }
    }
}

/// Registry entry for one tool, as configured under `tools.<name>`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Class the tool belongs to. Tools configured without a class fall
    /// back to `MEDIUM_SCRIPT`, the sentinel default.
    pub task_class: Option<TaskClass>,
    /// Per-tool timeout, overriding the class default.
    #[serde(default)]
    pub timeout: Option<u64>,
}

/// The effective class and timeout for an enqueue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTool {
    pub task_class: TaskClass,
    pub timeout_secs: u64,
}

/// Maps a tool name plus an optional enqueue-time override to the
/// effective timeout. Precedence: enqueue override, then the tool's own
/// timeout, then the (possibly reconfigured) class default.
#[derive(Debug, Clone, Default)]
pub struct ToolResolver {
    tools: HashMap<String, ToolSpec>,
    class_timeouts: HashMap<TaskClass, u64>,
}

impl ToolResolver {
    pub fn new(
        tools: HashMap<String, ToolSpec>,
        class_timeouts: HashMap<TaskClass, u64>,
    ) -> Self {
        Self { tools, class_timeouts }
    }

    /// Effective timeout for a configured class.
    pub fn class_timeout_secs(&self, class: TaskClass) -> u64 {
        self.class_timeouts
            .get(&class)
            .copied()
            .unwrap_or_else(|| class.default_timeout_secs())
    }

    pub fn known_tools(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    /// Resolve a tool name and optional override to `(class, timeout)`.
    ///
    /// Unknown tool names and non-positive overrides are validation
    /// failures; the caller must not retry them.
    pub fn resolve(
        &self,
        tool_name: &str,
        override_secs: Option<u64>,
    ) -> Result<ResolvedTool, CoreError> {
        let spec = self.tools.get(tool_name).ok_or_else(|| {
            CoreError::Validation(format!("unknown tool: {tool_name}"))
        })?;

        let task_class = spec.task_class.unwrap_or(TaskClass::MediumScript);

        let timeout_secs = match override_secs {
            Some(0) => {
                return Err(CoreError::Validation(
                    "timeout must be a positive number of seconds".to_string(),
                ))
            }
            Some(secs) => secs,
            None => spec
                .timeout
                .unwrap_or_else(|| self.class_timeout_secs(task_class)),
        };

        Ok(ResolvedTool { task_class, timeout_secs })
    }
}

#[cfg(test)]
#[path = "tools_tests.rs"]
mod tests;
