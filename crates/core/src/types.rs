//! 도메인 타입 -- 모든 크레이트가 공유하는 식별자
//!
//! 클라우드 프로바이더와 finding 심각도를 정의합니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 지원하는 클라우드 프로바이더
///
/// 직렬화 시 소문자 식별자(`aws`, `azure`, `gcp`)를 사용합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Amazon Web Services (S3)
    Aws,
    /// Microsoft Azure (Blob Storage)
    Azure,
    /// Google Cloud Platform (Cloud Storage)
    Gcp,
}

impl Provider {
    /// 지원하는 모든 프로바이더 (기본 스캔 순서)
    pub const ALL: [Provider; 3] = [Provider::Aws, Provider::Azure, Provider::Gcp];

    /// 소문자 식별자를 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aws => "aws",
            Self::Azure => "azure",
            Self::Gcp => "gcp",
        }
    }

    /// 문자열에서 프로바이더를 파싱합니다 (대소문자 구분 없음).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "aws" => Some(Self::Aws),
            "azure" => Some(Self::Azure),
            "gcp" => Some(Self::Gcp),
            _ => None,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 심각도 레벨
///
/// `Ord` 구현으로 심각도 비교가 가능합니다 (`Low < Medium < High < Critical`).
/// 직렬화 형식은 대문자 라벨(`"CRITICAL"`)입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// 낮은 심각도
    Low,
    /// 중간 심각도
    Medium,
    /// 높은 심각도
    High,
    /// 치명적 -- 즉시 대응 필요
    Critical,
}

impl Severity {
    /// 낮은 순서의 전체 심각도 목록
    pub const ORDER: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    /// 대문자 라벨을 반환합니다.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }

    /// 정렬용 순위 (LOW=0 .. CRITICAL=3)
    pub fn rank(&self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
            Self::Critical => 3,
        }
    }

    /// 위험 점수 가중치 (LOW=10 .. CRITICAL=40)
    pub fn weight(&self) -> u32 {
        (u32::from(self.rank()) + 1) * 10
    }

    /// 정확한 대문자 라벨에서 심각도를 파싱합니다.
    ///
    /// finding 생성 시 사용하며, 라벨이 정확히 일치하지 않으면 `None`을 반환합니다.
    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "LOW" => Some(Self::Low),
            "MEDIUM" => Some(Self::Medium),
            "HIGH" => Some(Self::High),
            "CRITICAL" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
