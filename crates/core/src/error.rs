// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Classified error taxonomy for core operations.
//!
//! Every operation surfaces exactly one of these kinds; callers branch on
//! the kind, not on message text. `Conflict` and `Transient` are the only
//! kinds a caller may recover from locally (skip-and-repoll, bounded
//! retry). The rest must be returned to the user unchanged.

use thiserror::Error;

/// Entity kinds referenced by not-found errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Project,
    Session,
    Queue,
    Task,
    Tool,
}

crate::simple_display! {
    EntityKind {
        Project => "project",
        Session => "session",
        Queue => "queue",
        Task => "task",
        Tool => "tool",
    }
}

/// Classified failure of a core operation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The referenced entity does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// The operation is invalid for the entity's current state. Carries
    /// the state that was observed so callers do not retry blindly.
    #[error("{message} (observed: {observed})")]
    Precondition { message: String, observed: String },

    /// Malformed input: empty summary, non-positive timeout, unknown
    /// tool, duplicate queue name.
    #[error("{0}")]
    Validation(String),

    /// Optimistic-concurrency loss: another claimer won the task. The
    /// runner treats this as "skip and re-poll".
    #[error("claim lost: {0}")]
    Conflict(String),

    /// Store busy. Retried a bounded number of times before surfacing.
    #[error("store busy: {0}")]
    Transient(String),

    /// Unexpected failure; never retried automatically.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound { kind, id: id.into() }
    }

    pub fn precondition(message: impl Into<String>, observed: impl std::fmt::Display) -> Self {
        Self::Precondition { message: message.into(), observed: observed.to_string() }
    }

    /// Stable machine-readable code for the wire error body.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::NotFound { .. } => "not_found",
            CoreError::Precondition { .. } => "precondition",
            CoreError::Validation(_) => "validation",
            CoreError::Conflict(_) => "conflict",
            CoreError::Transient(_) => "transient",
            CoreError::Internal(_) => "internal",
        }
    }

    /// Whether a bounded internal retry is appropriate.
    pub fn is_transient(&self) -> bool {
        matches!(self, CoreError::Transient(_))
    }
}

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::WouldBlock | std::io::ErrorKind::Interrupted => {
                CoreError::Transient(e.to_string())
            }
            _ => CoreError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
