// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sparkq-storage: the durable ordered store.
//!
//! Event-sourced: a write-ahead log of [`sparkq_core::Event`] entries is
//! the source of truth; [`state::MaterializedState`] is rebuilt from a
//! snapshot plus WAL replay on startup. The [`Store`] is the only write
//! path: every mutation validates under one lock, commits to the WAL,
//! then applies, so a returned success is durable and readers never see a
//! half-applied transition.

mod snapshot;
mod state;
mod store;
mod wal;

pub use snapshot::{load_snapshot, write_snapshot, Snapshot, SnapshotError, SNAPSHOT_VERSION};
pub use state::MaterializedState;
pub use store::{
    CheckpointSummary, DurabilityMode, QueuePatch, StatusCounts, Store, StoreOptions, TaskFilter,
    TaskPage, SNAPSHOT_FILE, WAL_FILE,
};
pub use wal::{Wal, WalEntry, WalError};
