// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! sparkq-runner: poll one queue, claim tasks, stream claim descriptors
//! to stdout for an external executor.

use anyhow::Context;
use clap::Parser;
use sparkq_runner::poll::{self, Mode, RunnerOptions};
use sparkq_runner::{ControlClient, HttpControlClient, LockError, RunnerLock};
use sparkq_server::Config;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Exit code for "another runner owns this queue".
const EXIT_LOCK_CONTENTION: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "sparkq-runner", version, about = "Per-queue SparkQ runner")]
struct Args {
    /// Queue name (globally unique, case-sensitive).
    queue: String,

    /// Polling behavior.
    #[arg(long, value_enum, default_value = "watch")]
    mode: Mode,

    /// Path to sparkq.toml (defaults to ./sparkq.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Server URL, overriding the configured host/port.
    #[arg(long)]
    server_url: Option<String>,

    /// Watch-mode sleep between polls, in seconds.
    #[arg(long)]
    poll_interval: Option<u64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("SPARKQ_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(RunnerExit::LockContention(message)) => {
            eprintln!("{message}");
            ExitCode::from(EXIT_LOCK_CONTENTION)
        }
        Err(RunnerExit::Fatal(error)) => {
            eprintln!("sparkq-runner: {error:#}");
            ExitCode::FAILURE
        }
    }
}

enum RunnerExit {
    LockContention(String),
    Fatal(anyhow::Error),
}

impl From<anyhow::Error> for RunnerExit {
    fn from(error: anyhow::Error) -> Self {
        RunnerExit::Fatal(error)
    }
}

async fn run(args: Args) -> Result<(), RunnerExit> {
    let config = Config::load(args.config.as_deref())
        .context("loading configuration")
        .map_err(RunnerExit::Fatal)?;
    let base_url = args.server_url.unwrap_or_else(|| config.server_url());

    let client = HttpControlClient::new(base_url);
    let queue = client
        .queue_by_name(&args.queue)
        .await
        .context("resolving queue")?
        .with_context(|| format!("queue not found: {}", args.queue))?;

    let lock = match RunnerLock::acquire(&queue.id) {
        Ok(lock) => lock,
        Err(e @ LockError::Held { .. }) => {
            return Err(RunnerExit::LockContention(e.to_string()));
        }
        Err(e) => return Err(RunnerExit::Fatal(e.into())),
    };

    let worker_id = poll::worker_id(&queue.name);
    eprint!("{}", poll::instructions_banner(&queue, &worker_id));

    let options = RunnerOptions {
        mode: args.mode,
        poll_interval: args
            .poll_interval
            .map(std::time::Duration::from_secs)
            .unwrap_or_else(|| config.poll_interval()),
        worker_id,
    };

    let token = CancellationToken::new();
    spawn_signal_handler(token.clone());

    let mut stdout = std::io::stdout();
    let summary = poll::run(&client, &queue, &options, &mut stdout, &token)
        .await
        .context("polling loop")?;

    info!(claimed = summary.claimed, queue = %queue.name, "runner exiting");
    drop(lock);
    Ok(())
}

/// Cancel the loop on SIGINT or SIGTERM so the lock is released on the
/// way out.
fn spawn_signal_handler(token: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = async {
            let _ = tokio::signal::ctrl_c().await;
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(_) => std::future::pending().await,
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => info!("received SIGINT, stopping after this tick"),
            _ = terminate => info!("received SIGTERM, stopping after this tick"),
        }
        token.cancel();
    });
}
