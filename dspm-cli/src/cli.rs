//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// dspmctl -- data security posture scans for cloud storage.
///
/// Use `dspmctl <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "dspmctl", version, about, long_about = None)]
pub struct Cli {
    /// Path to the dspm.toml configuration file.
    #[arg(short, long, global = true, default_value = "dspm.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a posture scan and print the risk summary.
    Scan(ScanArgs),

    /// Run a posture scan and write a report file.
    Report(ReportArgs),

    /// Inspect PII detection rules.
    Rules(RulesArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- scan ----

/// Scan the given providers (default: providers from configuration).
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Providers to scan (aws, azure, gcp).
    pub providers: Vec<String>,

    /// Exit with code 4 when the overall risk score reaches this value (1-100).
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub fail_on_score: Option<u32>,

    /// Override the PII rules file.
    #[arg(long)]
    pub rules: Option<PathBuf>,
}

// ---- report ----

/// Scan and write a Markdown or JSON report.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Providers to scan (aws, azure, gcp).
    pub providers: Vec<String>,

    /// Report format (markdown, json).
    #[arg(short, long)]
    pub format: Option<String>,

    /// Report file path.
    #[arg(short = 'o', long = "out")]
    pub out: Option<PathBuf>,

    /// Override the PII rules file.
    #[arg(long)]
    pub rules: Option<PathBuf>,
}

// ---- rules ----

/// Inspect PII detection rules.
#[derive(Args, Debug)]
pub struct RulesArgs {
    #[command(subcommand)]
    pub action: RulesAction,
}

#[derive(Subcommand, Debug)]
pub enum RulesAction {
    /// List the effective PII rules.
    List,
    /// Validate a rule file (default: configured rules path).
    Validate {
        /// JSON rule file.
        path: Option<PathBuf>,
    },
}

// ---- config ----

/// Manage dspm configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, scan, pii, providers, report, api).
        #[arg(long)]
        section: Option<String>,
    },
}
