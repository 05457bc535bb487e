// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session record: a named work period grouping queues.

use serde::{Deserialize, Serialize};

pub use crate::id::SessionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Ended,
}

crate::simple_display! {
    SessionStatus {
        Active => "active",
        Ended => "ended",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    /// Human-readable, non-empty.
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: SessionStatus,
    pub started_at_ms: u64,
    /// None while the session is active.
    pub ended_at_ms: Option<u64>,
    pub created_at_ms: u64,
    pub updated_at_ms: u64,
}

impl Session {
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }
}
