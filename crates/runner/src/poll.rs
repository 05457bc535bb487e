// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The polling loop: peek, claim, emit, repeat.
//!
//! The runner never executes tasks. It hands each claimed task to the
//! external executor as one JSON line on stdout and goes back to polling.
//! A lost claim (conflict) is normal contention: skip and re-poll. Any
//! other error is fatal for the tick: in watch mode the runner logs,
//! sleeps, and tries again; in once/drain it surfaces the error.

use crate::client::{ClientError, ControlClient};
use sparkq_wire::{ClaimDescriptor, QueueDetail};
use std::io::Write;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("failed to write claim descriptor: {0}")]
    Emit(#[from] std::io::Error),
}

/// How long the runner keeps polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Claim at most one task, print it, exit.
    Once,
    /// Claim until the queue is empty, then exit.
    Drain,
    /// Poll forever, sleeping between attempts.
    Watch,
}

#[derive(Debug, Clone)]
pub struct RunnerOptions {
    pub mode: Mode,
    /// Watch-mode sleep between empty polls.
    pub poll_interval: Duration,
    pub worker_id: String,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RunSummary {
    pub claimed: usize,
}

/// Stable worker identity for audit and logging: hostname plus the queue
/// name slugged the same way as friendly labels, lowercased.
pub fn worker_id(queue_name: &str) -> String {
    let host = std::env::var("HOSTNAME")
        .ok()
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "local".to_string());
    let slug = sparkq_core::friendly_label(queue_name, 0);
    let slug = slug.trim_end_matches("-0").to_ascii_lowercase();
    format!("{host}-{slug}")
}

/// The banner shown once on startup, before the loop. Instructions are
/// operator guidance, so they go to stderr with the diagnostics, never
/// to the descriptor stream.
pub fn instructions_banner(queue: &QueueDetail, worker_id: &str) -> String {
    let mut banner = String::new();
    banner.push_str(&format!("== queue: {} ({}) ==\n", queue.name, queue.id));
    banner.push_str(&format!("== worker: {worker_id} ==\n"));
    if queue.instructions.is_empty() {
        banner.push_str("(no instructions)\n");
    } else {
        banner.push_str(&queue.instructions);
        if !queue.instructions.ends_with('\n') {
            banner.push('\n');
        }
    }
    banner
}

/// Run the loop until the mode's exit condition or cancellation.
pub async fn run<C: ControlClient, W: Write>(
    client: &C,
    queue: &QueueDetail,
    options: &RunnerOptions,
    out: &mut W,
    token: &CancellationToken,
) -> Result<RunSummary, RunnerError> {
    let mut summary = RunSummary::default();

    loop {
        if token.is_cancelled() {
            break;
        }

        let peeked = match client.peek(&queue.id).await {
            Ok(peeked) => peeked,
            Err(e) => {
                if options.mode != Mode::Watch {
                    return Err(e.into());
                }
                warn!(error = %e, "peek failed, will retry");
                if sleep_or_cancel(token, options.poll_interval).await {
                    break;
                }
                continue;
            }
        };

        let Some(task) = peeked else {
            match options.mode {
                // Nothing to claim: once and drain are done.
                Mode::Once | Mode::Drain => break,
                Mode::Watch => {
                    if sleep_or_cancel(token, options.poll_interval).await {
                        break;
                    }
                    continue;
                }
            }
        };

        match client.claim(&task.id).await {
            Ok(descriptor) => {
                emit(out, &descriptor)?;
                info!(
                    task = %descriptor.id,
                    friendly = %descriptor.friendly_id,
                    worker = %options.worker_id,
                    "claimed"
                );
                summary.claimed += 1;
                if options.mode == Mode::Once {
                    break;
                }
            }
            Err(e) if e.is_conflict() => {
                // Another claimer won; skip and re-poll immediately.
                debug!(task = %task.id, "claim lost, re-polling");
            }
            Err(e) => {
                if options.mode != Mode::Watch {
                    return Err(e.into());
                }
                warn!(task = %task.id, error = %e, "claim failed, will retry");
                if sleep_or_cancel(token, options.poll_interval).await {
                    break;
                }
            }
        }
    }

    Ok(summary)
}

/// One JSON document per claimed task, newline-terminated, flushed so the
/// executor sees it immediately.
fn emit<W: Write>(out: &mut W, descriptor: &ClaimDescriptor) -> Result<(), std::io::Error> {
    let line = serde_json::to_string(descriptor).map_err(std::io::Error::other)?;
    out.write_all(line.as_bytes())?;
    out.write_all(b"\n")?;
    out.flush()
}

/// Returns true when cancelled during the sleep.
async fn sleep_or_cancel(token: &CancellationToken, interval: Duration) -> bool {
    tokio::select! {
        _ = token.cancelled() => true,
        _ = tokio::time::sleep(interval) => false,
    }
}

#[cfg(test)]
#[path = "poll_tests.rs"]
mod tests;
