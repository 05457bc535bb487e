// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot persistence for crash recovery.
//!
//! A snapshot holds the complete materialized state at a WAL sequence
//! number. Recovery loads the snapshot and replays WAL entries after that
//! sequence; checkpointing writes a new snapshot and truncates the log.

use crate::state::MaterializedState;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Current snapshot schema version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot encode error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot version {found} is newer than supported version {SNAPSHOT_VERSION}")]
    UnsupportedVersion { found: u32 },
}

/// The complete materialized state at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "v")]
    pub version: u32,
    /// WAL sequence number already folded into `state`.
    pub seq: u64,
    pub state: MaterializedState,
    pub created_at_ms: u64,
}

/// Load the snapshot at `path`, if any.
///
/// A missing file is a fresh data directory. A file that no longer parses
/// is rotated to a `.bak` backup and treated as missing, so recovery falls
/// back to replaying the full WAL instead of refusing to start.
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Option<Snapshot>, SnapshotError> {
    let path = path.as_ref();
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let snapshot: Snapshot = match serde_json::from_slice(&bytes) {
        Ok(s) => s,
        Err(e) => {
            let bak = rotate_bak_path(path);
            warn!(
                path = %path.display(),
                bak = %bak.display(),
                error = %e,
                "unreadable snapshot, rotating and recovering from WAL"
            );
            fs::rename(path, &bak)?;
            return Ok(None);
        }
    };

    if snapshot.version > SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion { found: snapshot.version });
    }

    Ok(Some(snapshot))
}

/// Write a snapshot atomically (temp file + rename).
pub fn write_snapshot(
    path: impl AsRef<Path>,
    seq: u64,
    state: &MaterializedState,
    created_at_ms: u64,
) -> Result<(), SnapshotError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION,
        seq,
        state: state.clone(),
        created_at_ms,
    };

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, serde_json::to_vec(&snapshot)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

const MAX_BAK_FILES: u32 = 3;

/// Pick the next `.bak` / `.bak.N` path, rotating older backups out.
/// Keeps at most [`MAX_BAK_FILES`] backups; the oldest is evicted.
pub(crate) fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };

    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }

    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }

    bak(1)
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
