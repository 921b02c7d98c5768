//! Markdown 리포트

use std::fmt::Write;

use crate::error::EngineError;
use crate::scanner::ScanResult;

/// 스캔 결과를 Markdown 문서로 렌더링합니다.
///
/// 설정 오류는 심각도 내림차순(같은 심각도는 탐지 순서)으로 나열됩니다.
pub fn render(result: &ScanResult) -> Result<String, EngineError> {
    build(result).map_err(|e| EngineError::Render(format!("failed to render markdown: {e}")))
}

fn build(result: &ScanResult) -> Result<String, std::fmt::Error> {
    let mut out = String::new();

    writeln!(out, "# DSPM Report")?;
    writeln!(out)?;
    writeln!(out, "- Scan ID: `{}`", result.scan_id)?;
    writeln!(
        out,
        "- Scanned at: {}",
        result.scanned_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    let providers: Vec<&str> = result.providers.iter().map(|p| p.as_str()).collect();
    writeln!(out, "- Providers: {}", providers.join(", "))?;
    writeln!(out)?;

    // 위험 요약
    let counts = result.severity_counts();
    writeln!(out, "## Risk Summary")?;
    writeln!(out)?;
    writeln!(out, "| Metric | Score |")?;
    writeln!(out, "|--------|-------|")?;
    writeln!(out, "| Overall risk | {} / 100 |", result.risk.score)?;
    writeln!(
        out,
        "| Misconfiguration | {} / 60 |",
        result.risk.misconfiguration_score
    )?;
    writeln!(out, "| Data exposure | {} / 40 |", result.risk.data_score)?;
    writeln!(out)?;
    writeln!(
        out,
        "Findings: {} critical, {} high, {} medium, {} low; {} PII matches.",
        counts.critical,
        counts.high,
        counts.medium,
        counts.low,
        result.pii_findings.len()
    )?;
    writeln!(out)?;

    // 자산
    writeln!(out, "## Assets")?;
    writeln!(out)?;
    if result.assets.is_empty() {
        writeln!(out, "_No assets discovered._")?;
    } else {
        writeln!(
            out,
            "| Provider | Name | Region | Public | Encryption | Versioning | Policy |"
        )?;
        writeln!(
            out,
            "|----------|------|--------|--------|------------|------------|--------|"
        )?;
        for asset in &result.assets {
            writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} | {} |",
                asset.provider(),
                cell(asset.name()),
                cell(asset.region().unwrap_or("-")),
                yes_no(asset.is_public()),
                cell(asset.encryption().unwrap_or("none")),
                yes_no(asset.versioning()),
                cell(asset.policy()),
            )?;
        }
    }
    writeln!(out)?;

    // 설정 오류
    writeln!(out, "## Misconfigurations")?;
    writeln!(out)?;
    if result.misconfigurations.is_empty() {
        writeln!(out, "_No misconfigurations detected._")?;
    } else {
        writeln!(out, "| Severity | Provider | Resource | Issue | Detail |")?;
        writeln!(out, "|----------|----------|----------|-------|--------|")?;
        for finding in result.sorted_misconfigurations() {
            writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                finding.severity,
                finding.provider,
                cell(&finding.resource),
                cell(&finding.issue),
                cell(&finding.detail),
            )?;
        }
    }
    writeln!(out)?;

    // PII
    writeln!(out, "## Sensitive Data")?;
    writeln!(out)?;
    if result.pii_findings.is_empty() {
        writeln!(out, "_No sensitive data detected._")?;
    } else {
        writeln!(out, "| Type | Provider | Location | Sample |")?;
        writeln!(out, "|------|----------|----------|--------|")?;
        for finding in &result.pii_findings {
            writeln!(
                out,
                "| {} | {} | `{}` | `{}` |",
                cell(&finding.kind),
                finding.provider,
                cell(&finding.location),
                cell(&finding.sample),
            )?;
        }
    }
    writeln!(out)?;

    // Lineage
    writeln!(out, "## Data Lineage")?;
    writeln!(out)?;
    writeln!(out, "```mermaid")?;
    writeln!(out, "{}", result.lineage.to_mermaid())?;
    writeln!(out, "```")?;

    Ok(out)
}

/// 표 셀 안의 파이프 문자를 이스케이프합니다.
fn cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
