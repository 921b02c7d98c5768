//! JSON 리포트

use serde::Serialize;

use crate::asset::AssetInventory;
use crate::error::EngineError;
use crate::lineage::LineageExport;
use crate::misconfig::MisconfigurationFinding;
use crate::pii::PiiFinding;
use crate::risk::RiskBreakdown;
use crate::scanner::ScanResult;

/// JSON 리포트 루트 구조
#[derive(Serialize)]
struct JsonReport<'a> {
    assets: &'a AssetInventory,
    pii_findings: &'a [PiiFinding],
    misconfigurations: &'a [MisconfigurationFinding],
    lineage: LineageExport,
    risk: RiskBreakdown,
}

/// 스캔 결과를 들여쓰기 2칸의 JSON 문서로 렌더링합니다.
///
/// 설정 오류는 탐지 순서 그대로 포함됩니다.
pub fn render(result: &ScanResult) -> Result<String, EngineError> {
    let report = JsonReport {
        assets: &result.assets,
        pii_findings: &result.pii_findings,
        misconfigurations: &result.misconfigurations,
        lineage: result.lineage.to_json(),
        risk: result.risk,
    };

    serde_json::to_string_pretty(&report)
        .map_err(|e| EngineError::Render(format!("failed to serialize JSON report: {e}")))
}
