//! `dspmctl scan` command handler

use std::io::Write;

use serde::Serialize;

use dspm_core::config::DspmConfig;
use dspm_core::types::Severity;
use dspm_engine::{
    MisconfigurationFinding, PiiFinding, RiskBreakdown, ScanResult, SeverityCounts,
};

use crate::cli::ScanArgs;
use crate::commands::{build_scanner, run_scan};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `scan` command.
///
/// Returns `CliError::RiskThreshold` (exit code 4) when the overall score
/// reaches `--fail-on-score` or `[scan] fail_on_score`.
pub async fn execute(
    args: ScanArgs,
    config: &DspmConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let mut scanner = build_scanner(config, args.rules.as_deref()).await?;
    let result = run_scan(&mut scanner, &args.providers)?;

    let report = ScanReport::from_result(&result);
    writer.render(&report)?;

    let threshold = args.fail_on_score.unwrap_or(config.scan.fail_on_score);
    check_threshold(report.risk.score, threshold)
}

/// A threshold of 0 disables the check.
fn check_threshold(score: u32, threshold: u32) -> Result<(), CliError> {
    if threshold > 0 && score >= threshold {
        return Err(CliError::RiskThreshold { score, threshold });
    }
    Ok(())
}

#[derive(Serialize)]
pub struct ScanReport {
    pub scan_id: String,
    pub providers: Vec<String>,
    pub assets: usize,
    pub risk: RiskBreakdown,
    pub severity: SeverityCounts,
    /// Sorted by severity, highest first.
    pub misconfigurations: Vec<MisconfigurationFinding>,
    pub pii_findings: Vec<PiiFinding>,
}

impl ScanReport {
    pub fn from_result(result: &ScanResult) -> Self {
        Self {
            scan_id: result.scan_id.to_string(),
            providers: result.providers.iter().map(|p| p.to_string()).collect(),
            assets: result.assets.len(),
            risk: result.risk,
            severity: result.severity_counts(),
            misconfigurations: result.sorted_misconfigurations(),
            pii_findings: result.pii_findings.clone(),
        }
    }
}

impl Render for ScanReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Scan: {}", self.scan_id.bold())?;
        writeln!(w, "Providers: {}", self.providers.join(", "))?;
        writeln!(w, "Assets discovered: {}", self.assets)?;
        writeln!(w)?;

        let score = format!("{} / 100", self.risk.score);
        let score_colored = match self.risk.score {
            70.. => score.red().bold(),
            40..=69 => score.yellow().bold(),
            _ => score.green().bold(),
        };
        writeln!(w, "Risk score: {}", score_colored)?;
        writeln!(
            w,
            "  Misconfiguration: {} / 60",
            self.risk.misconfiguration_score
        )?;
        writeln!(w, "  Data exposure:    {} / 40", self.risk.data_score)?;
        writeln!(
            w,
            "Findings: {} total (C:{} H:{} M:{} L:{}), {} PII matches",
            self.severity.total(),
            self.severity.critical,
            self.severity.high,
            self.severity.medium,
            self.severity.low,
            self.pii_findings.len()
        )?;
        writeln!(w)?;

        if self.misconfigurations.is_empty() {
            writeln!(w, "{}", "No misconfigurations detected.".green())?;
        } else {
            writeln!(
                w,
                "{:<10} {:<7} {:<24} Issue",
                "Severity", "Cloud", "Resource"
            )?;
            writeln!(w, "{}", "-".repeat(72))?;
            for f in &self.misconfigurations {
                let label = f.severity.label();
                let severity_colored = match f.severity {
                    Severity::Critical => label.red().bold(),
                    Severity::High => label.red(),
                    Severity::Medium => label.yellow(),
                    Severity::Low => label.normal(),
                };
                writeln!(
                    w,
                    "{:<10} {:<7} {:<24} {}",
                    severity_colored,
                    f.provider.as_str(),
                    f.resource,
                    f.issue
                )?;
            }
        }
        writeln!(w)?;

        if self.pii_findings.is_empty() {
            writeln!(w, "{}", "No sensitive data detected.".green())?;
        } else {
            writeln!(w, "{:<12} {:<40} Sample", "Type", "Location")?;
            writeln!(w, "{}", "-".repeat(72))?;
            for f in &self.pii_findings {
                writeln!(w, "{:<12} {:<40} {}", f.kind, f.location, f.sample)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dspm_engine::DspmScannerBuilder;

    fn sample_report() -> ScanReport {
        let mut scanner = DspmScannerBuilder::new().build().expect("scanner should build");
        let result = scanner
            .scan(&["aws", "azure", "gcp"])
            .expect("sample scan should succeed");
        ScanReport::from_result(&result)
    }

    #[test]
    fn test_threshold_disabled_at_zero() {
        assert!(check_threshold(100, 0).is_ok());
    }

    #[test]
    fn test_threshold_reached() {
        let err = check_threshold(85, 85).expect_err("score equal to threshold should fail");
        assert_eq!(err.exit_code(), 4);
        assert!(check_threshold(84, 85).is_ok());
    }

    #[test]
    fn test_scan_report_sorted_by_severity() {
        let report = sample_report();
        assert_eq!(report.assets, 6);
        assert_eq!(report.misconfigurations[0].severity, Severity::Critical);
        let last = report.misconfigurations.last().expect("findings exist");
        assert_eq!(last.severity, Severity::Medium);
    }

    #[test]
    fn test_scan_report_render_text() {
        let report = sample_report();
        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("Providers: aws, azure, gcp"));
        assert!(output.contains("85 / 100"));
        assert!(output.contains("Public access enabled"));
        assert!(output.contains("aws://finance-uploads/sample.txt"));
    }

    #[test]
    fn test_scan_report_json_shape() {
        let report = sample_report();
        let json = serde_json::to_value(&report).expect("JSON serialization should succeed");
        assert_eq!(json["risk"]["score"], 85);
        assert_eq!(json["severity"]["critical"], 3);
        assert_eq!(json["providers"][0], "aws");
        assert_eq!(json["pii_findings"][0]["type"], "Medicare");
        assert_eq!(json["misconfigurations"][0]["severity"], "CRITICAL");
    }
}
