// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier newtypes for every entity kind.
//!
//! All ids share one shape: a 4-character kind prefix plus a 19-character
//! nanoid, 23 bytes total. The prefix makes an id self-describing in logs
//! and on the wire without consulting the store.

crate::define_id! {
    /// Identifier for the singleton project record.
    pub struct ProjectId("prj-");
}

crate::define_id! {
    /// Identifier for a work session.
    pub struct SessionId("ses-");
}

crate::define_id! {
    /// Identifier for a queue.
    pub struct QueueId("que-");
}

crate::define_id! {
    /// Identifier for a task. Distinct from the per-queue friendly label,
    /// which is assigned at enqueue time and never reused.
    pub struct TaskId("tsk-");
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
