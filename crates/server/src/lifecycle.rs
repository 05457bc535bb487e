// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server startup and shutdown.
//!
//! Startup order matters: the lock comes first so two servers can never
//! race on one data directory, then the store recovers from snapshot plus
//! WAL. Shutdown checkpoints so the next startup replays nothing.

use crate::config::{Config, ConfigError};
use fs2::FileExt;
use sparkq_core::{CoreError, SystemClock};
use sparkq_storage::{Store, StoreOptions};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Pid-bearing lock file name inside the data directory.
pub const LOCK_FILE: &str = "server.lock";

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("another server holds {0} (is sparkqd already running?)")]
    LockHeld(PathBuf),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("store error: {0}")]
    Store(#[from] CoreError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A running server's owned resources. Dropping releases the lock;
/// [`ServerState::shutdown`] does an orderly checkpoint first.
#[derive(Debug)]
pub struct ServerState {
    pub config: Config,
    pub store: Arc<Store<SystemClock>>,
    // NOTE(lifetime): held to maintain the exclusive lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    lock_path: PathBuf,
}

/// Start the server: acquire the singleton lock, then recover the store.
pub fn startup(config: Config) -> Result<ServerState, LifecycleError> {
    let data_dir = config.data_dir().to_path_buf();
    std::fs::create_dir_all(&data_dir)?;

    let lock_path = data_dir.join(LOCK_FILE);
    let lock_file = acquire_lock(&lock_path)?;

    let store = Store::open(
        &data_dir,
        StoreOptions {
            mode: config.durability_mode()?,
            project: config.project_seed(),
        },
        SystemClock,
    )?;

    info!(
        sessions = store.session_count(),
        queues = store.queue_count(),
        tasks = store.task_count(),
        data_dir = %data_dir.display(),
        "server state recovered"
    );

    Ok(ServerState { config, store: Arc::new(store), lock_file, lock_path })
}

/// Take the exclusive advisory lock and record our pid in the file.
///
/// Open without truncating: wiping the file before holding the lock would
/// destroy the running server's recorded pid.
fn acquire_lock(lock_path: &Path) -> Result<File, LifecycleError> {
    let file = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)?;

    if file.try_lock_exclusive().is_err() {
        let holder = std::fs::read_to_string(lock_path).unwrap_or_default();
        let holder = holder.trim();
        if !holder.is_empty() {
            warn!(pid = holder, path = %lock_path.display(), "lock held by another server");
        }
        return Err(LifecycleError::LockHeld(lock_path.to_path_buf()));
    }

    let mut file = file;
    file.set_len(0)?;
    writeln!(file, "{}", std::process::id())?;
    Ok(file)
}

impl ServerState {
    /// Orderly shutdown: checkpoint the store and remove the lock file.
    pub fn shutdown(self) -> Result<(), LifecycleError> {
        match self.store.checkpoint() {
            Ok(summary) => {
                info!(seq = summary.seq, tasks = summary.tasks, "saved shutdown snapshot")
            }
            Err(e) => warn!("failed to checkpoint on shutdown: {e}"),
        }

        if let Err(e) = std::fs::remove_file(&self.lock_path) {
            warn!("failed to remove lock file: {e}");
        }
        info!("server shutdown complete");
        Ok(())
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
