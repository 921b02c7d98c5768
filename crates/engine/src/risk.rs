//! 위험 점수 산출
//!
//! - 설정 오류 점수: 심각도 가중치 합 (LOW=10, MEDIUM=20, HIGH=30, CRITICAL=40), 상한 60
//! - 데이터 점수: PII finding이 없으면 0, 있으면 `10 + 5 × 개수`, 상한 40
//! - 총점: 두 점수의 합, 상한 100

use serde::{Deserialize, Serialize};

use crate::misconfig::MisconfigurationFinding;
use crate::pii::PiiFinding;

/// 설정 오류 점수 상한
pub const MAX_MISCONFIGURATION_SCORE: u32 = 60;
/// 데이터 점수 상한
pub const MAX_DATA_SCORE: u32 = 40;
/// 총점 상한
pub const MAX_SCORE: u32 = 100;

/// PII가 하나라도 있을 때의 기본 데이터 점수
const DATA_SCORE_BASE: u32 = 10;
/// PII finding당 추가 데이터 점수
const DATA_SCORE_PER_FINDING: u32 = 5;

/// 위험 점수 분해
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskBreakdown {
    /// 총점 (0-100)
    pub score: u32,
    /// 설정 오류 점수 (0-60)
    pub misconfiguration_score: u32,
    /// 데이터 노출 점수 (0-40)
    pub data_score: u32,
}

/// 위험 점수 계산기
///
/// 순수 함수이며 실패하지 않습니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskAssessor;

impl RiskAssessor {
    pub fn new() -> Self {
        Self
    }

    pub fn calculate(
        &self,
        pii_findings: &[PiiFinding],
        misconfigurations: &[MisconfigurationFinding],
    ) -> RiskBreakdown {
        let misconfiguration_score = misconfigurations
            .iter()
            .fold(0u32, |acc, f| acc.saturating_add(f.severity.weight()))
            .min(MAX_MISCONFIGURATION_SCORE);

        let data_score = if pii_findings.is_empty() {
            0
        } else {
            let count = u32::try_from(pii_findings.len()).unwrap_or(u32::MAX);
            DATA_SCORE_BASE
                .saturating_add(DATA_SCORE_PER_FINDING.saturating_mul(count))
                .min(MAX_DATA_SCORE)
        };

        RiskBreakdown {
            score: (misconfiguration_score + data_score).min(MAX_SCORE),
            misconfiguration_score,
            data_score,
        }
    }
}
