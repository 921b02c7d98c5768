//! Command handlers -- one module per subcommand

pub mod config;
pub mod report;
pub mod rules;
pub mod scan;

use std::path::{Path, PathBuf};

use tracing::info;

use dspm_core::config::DspmConfig;
use dspm_engine::{DspmScanner, DspmScannerBuilder, PiiRuleLoader, ScanConfig, ScanResult};

use crate::error::CliError;

/// Build a scanner from the effective configuration.
///
/// `rules_override` replaces `[pii] rules_path`. A missing rules file falls
/// back to the built-in rules.
pub(crate) async fn build_scanner(
    config: &DspmConfig,
    rules_override: Option<&Path>,
) -> Result<DspmScanner, CliError> {
    let scan_config = ScanConfig::from_core(config);
    let rules_path = rules_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&scan_config.rules_path));

    let rules = PiiRuleLoader::load(&rules_path).await?;
    let scanner = DspmScannerBuilder::new()
        .config(scan_config)
        .rules(rules)
        .build()?;
    Ok(scanner)
}

/// Scan the requested providers, or the configured defaults when none are given.
pub(crate) fn run_scan(
    scanner: &mut DspmScanner,
    providers: &[String],
) -> Result<ScanResult, CliError> {
    let result = if providers.is_empty() {
        scanner.scan_default()?
    } else {
        scanner.scan(providers)?
    };
    info!(
        scan_id = %result.scan_id,
        score = result.risk.score,
        "scan finished"
    );
    Ok(result)
}
