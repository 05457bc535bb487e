// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sparkq-wire: HTTP DTOs shared by the server and the runner.
//!
//! Request bodies, query parameters, and response shapes. The shapes are
//! the contract: the runner parses exactly what the server serializes,
//! and the claim descriptor is the document a runner hands to its
//! executor on stdout.

mod request;
mod response;

pub use request::{
    CascadeQuery, CompleteRequest, CreateQueueRequest, CreateSessionRequest, EnqueueRequest,
    FailRequest, QueueListQuery, TaskListQuery, UpdateQueueRequest, UpdateSessionRequest,
    UpdateTaskRequest,
};
pub use response::{
    ClaimDescriptor, ErrorBody, ErrorInfo, Health, QueueDetail, QueueRef, QueueWithQueued,
    SessionDetail, TaskDetail, TaskPage, VersionInfo,
};
