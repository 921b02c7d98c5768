//! 설정 오류 탐지 -- 고정 규칙 기반 스토리지 보안 상태 평가
//!
//! 자산마다 독립적으로 아래 규칙을 순서대로 평가합니다.
//!
//! | 순서 | 조건 | 심각도 | 이슈 |
//! |------|------|--------|------|
//! | 1 | `public` | CRITICAL | Public access enabled |
//! | 2 | 암호화 없음 | HIGH | Missing encryption at rest |
//! | 3 | 버저닝 꺼짐 | MEDIUM | Versioning disabled |
//! | 4 | 정책이 allow-all/allusers/public | HIGH | Overly permissive policy |
//! | 5 | `backup=true` 태그 + 버저닝 꺼짐 | HIGH | Backups without immutability |

use serde::Serialize;
use tracing::debug;

use dspm_core::types::{Provider, Severity};

use crate::asset::StorageAsset;
use crate::error::EngineError;

/// 과도하게 허용적인 정책 값 (소문자 비교)
const PERMISSIVE_POLICIES: [&str; 3] = ["allow-all", "allusers", "public"];

/// 설정 오류 finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MisconfigurationFinding {
    /// 자산 이름
    pub resource: String,
    /// 프로바이더
    pub provider: Provider,
    /// 이슈 요약
    pub issue: String,
    /// 심각도
    pub severity: Severity,
    /// 조치 안내
    pub detail: String,
}

impl MisconfigurationFinding {
    /// 심각도 라벨로 finding을 생성합니다.
    ///
    /// # Errors
    ///
    /// 라벨이 `LOW`/`MEDIUM`/`HIGH`/`CRITICAL` 중 하나와 정확히 일치하지 않으면
    /// `EngineError::InvalidSeverity`
    pub fn new(
        resource: impl Into<String>,
        provider: Provider,
        issue: impl Into<String>,
        severity: &str,
        detail: impl Into<String>,
    ) -> Result<Self, EngineError> {
        let severity = Severity::from_label(severity)
            .ok_or_else(|| EngineError::InvalidSeverity(severity.to_owned()))?;
        Ok(Self::with_severity(resource, provider, issue, severity, detail))
    }

    /// 타입이 있는 심각도로 finding을 생성합니다.
    pub fn with_severity(
        resource: impl Into<String>,
        provider: Provider,
        issue: impl Into<String>,
        severity: Severity,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            resource: resource.into(),
            provider,
            issue: issue.into(),
            severity,
            detail: detail.into(),
        }
    }
}

/// 단일 설정 오류 규칙
struct MisconfigRule {
    issue: &'static str,
    severity: Severity,
    detail: &'static str,
    applies: fn(&StorageAsset) -> bool,
}

const RULES: [MisconfigRule; 5] = [
    MisconfigRule {
        issue: "Public access enabled",
        severity: Severity::Critical,
        detail: "Asset exposes data to the internet; review ACL and IAM bindings.",
        applies: |asset| asset.is_public(),
    },
    MisconfigRule {
        issue: "Missing encryption at rest",
        severity: Severity::High,
        detail: "Enable server-side encryption with customer-managed keys.",
        applies: |asset| asset.encryption().is_none_or(str::is_empty),
    },
    MisconfigRule {
        issue: "Versioning disabled",
        severity: Severity::Medium,
        detail: "Versioning helps recover from ransomware and accidental overwrites.",
        applies: |asset| !asset.versioning(),
    },
    MisconfigRule {
        issue: "Overly permissive policy",
        severity: Severity::High,
        detail: "Restrict bucket policies and IAM bindings to least privilege.",
        applies: |asset| PERMISSIVE_POLICIES.contains(&asset.policy().to_lowercase().as_str()),
    },
    MisconfigRule {
        issue: "Backups without immutability",
        severity: Severity::High,
        detail: "Enable versioning or object lock on backup destinations.",
        applies: |asset| asset.tag("backup") == Some("true") && !asset.versioning(),
    },
];

/// 설정 오류 탐지기
///
/// 상태가 없으며 같은 입력에 항상 같은 결과를 반환합니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct MisconfigurationDetector;

impl MisconfigurationDetector {
    pub fn new() -> Self {
        Self
    }

    /// 자산 목록을 평가합니다.
    ///
    /// 결과 순서: 입력 자산 순서 → 자산 내 규칙 순서.
    pub fn evaluate(
        &self,
        provider: Provider,
        assets: &[StorageAsset],
    ) -> Vec<MisconfigurationFinding> {
        let mut findings = Vec::new();
        for asset in assets {
            debug!(provider = %provider, asset = asset.name(), "evaluating posture");
            findings.extend(RULES.iter().filter(|rule| (rule.applies)(asset)).map(|rule| {
                MisconfigurationFinding::with_severity(
                    asset.name(),
                    provider,
                    rule.issue,
                    rule.severity,
                    rule.detail,
                )
            }));
        }
        findings
    }

    /// 평가되는 규칙 수
    pub fn rule_count(&self) -> usize {
        RULES.len()
    }
}

/// 심각도 내림차순으로 안정 정렬한 사본을 반환합니다.
///
/// 같은 심각도의 finding은 입력 순서를 유지합니다.
pub fn sort_findings(findings: &[MisconfigurationFinding]) -> Vec<MisconfigurationFinding> {
    let mut sorted = findings.to_vec();
    sorted.sort_by(|a, b| b.severity.cmp(&a.severity));
    sorted
}
