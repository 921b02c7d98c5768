//! Command-line arguments for dspm-api.

use std::path::PathBuf;

use clap::Parser;

/// DSPM HTTP API server.
///
/// Serves scan results for the configured providers as JSON.
#[derive(Parser, Debug)]
#[command(name = "dspm-api")]
#[command(version, about, long_about = None)]
pub struct ApiCli {
    /// Path to the dspm.toml configuration file (defaults are used when absent).
    #[arg(short, long, default_value = "dspm.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override `[api] listen_addr`.
    #[arg(long)]
    pub listen: Option<String>,
}
