// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-instance enforcement per queue.
//!
//! An OS advisory lock, not a pidfile scheme: the lock dies with the
//! process, so a crashed runner never blocks its queue. The pid written
//! into the file is diagnostic only: it names the holder in the error a
//! second runner prints before exiting.

use fs2::FileExt;
use sparkq_core::QueueId;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LockError {
    #[error("another runner for this queue holds {path} (pid {pid})")]
    Held { path: PathBuf, pid: String },
    #[error("lock io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Held advisory lock. Released (and the file removed) on drop.
#[derive(Debug)]
pub struct RunnerLock {
    file: File,
    path: PathBuf,
}

impl RunnerLock {
    /// `<tmp>/sparkq-runner-<queue_id>.lock`
    pub fn path_for(queue_id: &QueueId) -> PathBuf {
        std::env::temp_dir().join(format!("sparkq-runner-{queue_id}.lock"))
    }

    pub fn acquire(queue_id: &QueueId) -> Result<Self, LockError> {
        Self::acquire_at(Self::path_for(queue_id))
    }

    /// Take the lock at an explicit path.
    ///
    /// Open without truncating: wiping the file before holding the lock
    /// would erase the live holder's recorded pid.
    pub fn acquire_at(path: PathBuf) -> Result<Self, LockError> {
        let file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        if file.try_lock_exclusive().is_err() {
            let pid = std::fs::read_to_string(&path)
                .map(|s| s.trim().to_string())
                .unwrap_or_default();
            let pid = if pid.is_empty() { "unknown".to_string() } else { pid };
            return Err(LockError::Held { path, pid });
        }

        // A dead holder's lock vanished with its process; whatever pid it
        // left behind is stale and ours replaces it.
        let mut file = file;
        file.set_len(0)?;
        writeln!(file, "{}", std::process::id())?;
        debug!(path = %path.display(), "runner lock acquired");

        Ok(Self { file, path })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl Drop for RunnerLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
        let _ = std::fs::remove_file(&self.path);
        debug!(path = %self.path.display(), "runner lock released");
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
