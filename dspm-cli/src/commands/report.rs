//! `dspmctl report` command handler

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

use dspm_core::config::DspmConfig;
use dspm_engine::{ReportFormat, ReportGenerator};

use crate::cli::ReportArgs;
use crate::commands::{build_scanner, run_scan};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `report` command.
pub async fn execute(
    args: ReportArgs,
    config: &DspmConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let format = resolve_format(args.format.as_deref(), config)?;
    let path = resolve_path(args.out, format, config);
    debug!(path = %path.display(), format = %format, "resolved report target");

    let mut scanner = build_scanner(config, args.rules.as_deref()).await?;
    let result = run_scan(&mut scanner, &args.providers)?;

    ReportGenerator::new(format).write(&result, &path).await?;

    let summary = ReportSummary {
        path: path.display().to_string(),
        format: format.to_string(),
        score: result.risk.score,
        assets: result.assets.len(),
        misconfigurations: result.misconfigurations.len(),
        pii_findings: result.pii_findings.len(),
    };
    writer.render(&summary)
}

fn resolve_format(flag: Option<&str>, config: &DspmConfig) -> Result<ReportFormat, CliError> {
    let raw = flag.unwrap_or(&config.report.format);
    ReportFormat::from_str_loose(raw).ok_or_else(|| {
        CliError::Command(format!(
            "invalid report format: {} (expected: markdown, json)",
            raw
        ))
    })
}

/// Without `--out`, the configured path is used with the format's extension.
fn resolve_path(flag: Option<PathBuf>, format: ReportFormat, config: &DspmConfig) -> PathBuf {
    flag.unwrap_or_else(|| PathBuf::from(&config.report.output).with_extension(format.extension()))
}

#[derive(Serialize)]
pub struct ReportSummary {
    pub path: String,
    pub format: String,
    pub score: u32,
    pub assets: usize,
    pub misconfigurations: usize,
    pub pii_findings: usize,
}

impl Render for ReportSummary {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Report written: {} ({})", self.path.bold(), self.format)?;
        writeln!(
            w,
            "Risk score {} / 100 across {} assets: {} misconfigurations, {} PII matches",
            self.score, self.assets, self.misconfigurations, self.pii_findings
        )?;
        Ok(())
    }
}
