//! 리포트 생성 -- 스캔 결과를 Markdown / JSON 문서로 렌더링
//!
//! # 지원 형식
//!
//! - JSON: `{assets, pii_findings, misconfigurations, lineage, risk}` (들여쓰기 2칸)
//! - Markdown: 위험 요약, 자산 표, 심각도순 설정 오류, PII finding, Mermaid lineage

pub mod json;
pub mod markdown;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::EngineError;
use crate::scanner::ScanResult;

/// 리포트 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Markdown 문서
    #[default]
    Markdown,
    /// JSON 문서
    Json,
}

impl ReportFormat {
    /// 문자열에서 리포트 형식을 파싱합니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "markdown" | "md" => Some(Self::Markdown),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// 기본 파일 확장자
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markdown => write!(f, "markdown"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// 리포트 생성기
#[derive(Debug, Clone, Copy)]
pub struct ReportGenerator {
    format: ReportFormat,
}

impl ReportGenerator {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> ReportFormat {
        self.format
    }

    /// 스캔 결과를 문자열로 렌더링합니다.
    pub fn render(&self, result: &ScanResult) -> Result<String, EngineError> {
        match self.format {
            ReportFormat::Json => json::render(result),
            ReportFormat::Markdown => markdown::render(result),
        }
    }

    /// 렌더링한 리포트를 파일로 씁니다.
    pub async fn write(&self, result: &ScanResult, path: impl AsRef<Path>) -> Result<(), EngineError> {
        let path = path.as_ref();
        let content = self.render(result)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| EngineError::Io {
                    path: parent.display().to_string(),
                    source: e,
                })?;
        }

        tokio::fs::write(path, content.as_bytes())
            .await
            .map_err(|e| EngineError::Io {
                path: path.display().to_string(),
                source: e,
            })?;

        info!(path = %path.display(), format = %self.format, bytes = content.len(), "report written");
        Ok(())
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(ReportFormat::default())
    }
}
