//! 스캔 엔진 에러 타입
//!
//! [`EngineError`]는 스캔 파이프라인 내에서 발생할 수 있는 모든 에러를 나타냅니다.
//! `From<EngineError> for DspmError` 구현을 통해 `?` 연산자로
//! 상위 에러 타입으로 자연스럽게 전파됩니다.
//!
//! # 에러 카테고리
//!
//! - **입력 검증**: `UnsupportedProvider`, `UnsupportedProviders`
//! - **프로그래머 에러**: `InvalidSeverity`
//! - **자산 탐색**: `Discovery`, `InventoryLoad`
//! - **PII 규칙**: `RuleLoad`, `RuleCompile`
//! - **설정**: `Config`
//! - **출력**: `Render`, `Io`

use dspm_core::error::{ConfigError, DspmError, ScanError};
use dspm_core::types::Provider;

/// 스캔 엔진 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// 정의되지 않은 심각도 라벨로 finding 생성 시도
    #[error("invalid severity label: '{0}' (expected LOW, MEDIUM, HIGH or CRITICAL)")]
    InvalidSeverity(String),

    /// 레지스트리에 등록되지 않은 프로바이더
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// 스캔 요청에 포함된 지원하지 않는 프로바이더 목록 (정렬됨)
    #[error("unsupported providers requested: {}", .0.join(", "))]
    UnsupportedProviders(Vec<String>),

    /// 프로바이더 자산 탐색 실패
    #[error("discovery failed for {provider}: {reason}")]
    Discovery {
        /// 대상 프로바이더
        provider: Provider,
        /// 실패 사유
        reason: String,
    },

    /// 인벤토리 fixture 파일 로딩 실패
    #[error("inventory load error: {path}: {reason}")]
    InventoryLoad {
        /// 인벤토리 파일 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// PII 규칙 파일 로딩/파싱 실패
    #[error("pii rule load error: {path}: {reason}")]
    RuleLoad {
        /// 규칙 파일 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// PII 규칙 정규식 컴파일 실패
    #[error("pii rule '{rule}' failed to compile: {reason}")]
    RuleCompile {
        /// 규칙 이름
        rule: String,
        /// 컴파일 에러
        reason: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 리포트 렌더링 실패
    #[error("render error: {0}")]
    Render(String),

    /// 파일 I/O 에러
    #[error("io error: {path}: {source}")]
    Io {
        /// 관련 파일 경로
        path: String,
        /// 원본 I/O 에러
        source: std::io::Error,
    },
}

impl From<EngineError> for DspmError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidSeverity(label) => DspmError::Scan(ScanError::InvalidFinding(
                format!("invalid severity label: '{label}'"),
            )),
            EngineError::UnsupportedProvider(provider) => {
                DspmError::Scan(ScanError::UnsupportedProviders(provider))
            }
            EngineError::UnsupportedProviders(providers) => {
                DspmError::Scan(ScanError::UnsupportedProviders(providers.join(", ")))
            }
            EngineError::Discovery { provider, reason } => {
                DspmError::Scan(ScanError::Discovery(format!("{provider}: {reason}")))
            }
            EngineError::InventoryLoad { path, reason } => DspmError::Scan(ScanError::Discovery(
                format!("inventory load error: {path}: {reason}"),
            )),
            EngineError::RuleLoad { path, reason } => {
                DspmError::Scan(ScanError::Rule(format!("{path}: {reason}")))
            }
            EngineError::RuleCompile { rule, reason } => {
                DspmError::Scan(ScanError::Rule(format!("'{rule}': {reason}")))
            }
            EngineError::Config { field, reason } => {
                DspmError::Config(ConfigError::InvalidValue { field, reason })
            }
            EngineError::Render(msg) => DspmError::Scan(ScanError::Report(msg)),
            EngineError::Io { source, .. } => DspmError::Io(source),
        }
    }
}
