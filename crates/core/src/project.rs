// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Singleton project record.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use crate::id::ProjectId;

/// Identity supplied at first startup of a data directory.
#[derive(Debug, Clone)]
pub struct ProjectSeed {
    pub name: String,
    pub repo_path: PathBuf,
}

/// Project-level identity. Created once when the data directory is
/// initialized; never destroyed during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub repo_path: PathBuf,
    pub created_at_ms: u64,
    pub updated_at_ms: u64,
}
