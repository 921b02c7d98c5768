//! dspmctl -- command-line entry point
//!
//! Loads `dspm.toml` (defaults when the file is absent), initializes tracing to
//! stderr, and dispatches to one handler per subcommand.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;
use colored::Colorize;

use dspm_core::config::{DspmConfig, GeneralConfig};

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output);

    // `config validate` reports load failures itself, so logging falls back to defaults here.
    let loaded = DspmConfig::load_or_default(&cli.config).await;
    let general = loaded
        .as_ref()
        .map(|c| c.general.clone())
        .unwrap_or_else(|_| GeneralConfig::default());
    logging::init_tracing(&general, cli.log_level.as_deref())?;
    dspm_core::metrics::describe_all();

    tracing::debug!(config = %cli.config.display(), "dspmctl starting");

    match cli.command {
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
        Commands::Scan(args) => commands::scan::execute(args, &loaded?, &writer).await,
        Commands::Report(args) => commands::report::execute(args, &loaded?, &writer).await,
        Commands::Rules(args) => commands::rules::execute(args, &loaded?, &writer).await,
    }
}
