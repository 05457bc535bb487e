// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Liveness and build identity.

use axum::response::Json;
use sparkq_wire::{Health, VersionInfo};

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok".to_string() })
}

pub async fn version() -> Json<VersionInfo> {
    Json(VersionInfo {
        version: crate::VERSION.to_string(),
        git_hash: crate::GIT_HASH.to_string(),
    })
}
