//! dspm-api -- HTTP server entry point

mod cli;
mod logging;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use dspm_api::{AppState, create_router};
use dspm_core::config::DspmConfig;

use crate::cli::ApiCli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = ApiCli::parse();

    let config = DspmConfig::load_or_default(&cli.config)
        .await
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    logging::init_tracing(&config.general, cli.log_level.as_deref())?;
    dspm_core::metrics::describe_all();

    let listen = cli.listen.unwrap_or_else(|| config.api.listen_addr.clone());
    let addr: SocketAddr = listen
        .parse()
        .with_context(|| format!("invalid listen address '{}'", listen))?;

    let state = AppState::from_config(&config)
        .await
        .context("failed to build scanner")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(addr = %addr, "dspm-api listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("dspm-api shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
