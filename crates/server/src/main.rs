// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! sparkqd: the SparkQ server binary.

use anyhow::Context;
use clap::Parser;
use sparkq_server::http::{self, AppState};
use sparkq_server::supervisor::{self, SupervisorConfig};
use sparkq_server::{lifecycle, Config};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sparkqd", version, about = "SparkQ task-dispatch server")]
struct Args {
    /// Path to sparkq.toml (defaults to ./sparkq.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured data directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Override the configured bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the configured bind port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("SPARKQ_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(data_dir) = args.data_dir {
        config.database.path = data_dir;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let state = lifecycle::startup(config).context("starting server")?;
    let store = Arc::clone(&state.store);

    let token = CancellationToken::new();
    let supervisors = supervisor::spawn(
        Arc::clone(&store),
        SupervisorConfig {
            stale_interval: state.config.stale_interval(),
            purge_interval: state.config.purge_interval(),
            retention: state.config.retention(),
        },
        token.clone(),
    );

    let resolver = state.config.tool_resolver().context("building tool registry")?;
    let app = http::router(AppState { store, resolver: Arc::new(resolver) });

    let addr = state.config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(
        version = sparkq_server::VERSION,
        git_hash = sparkq_server::GIT_HASH,
        %addr,
        "sparkqd listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving")?;

    // In-flight requests are done; stop the supervisors between ticks.
    token.cancel();
    for handle in supervisors {
        let _ = handle.await;
    }

    state.shutdown()?;
    Ok(())
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
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
        _ = ctrl_c => info!("received SIGINT, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
