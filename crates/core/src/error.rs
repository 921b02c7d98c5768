//! 에러 타입 -- 도메인별 에러 정의

/// DSPM 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum DspmError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 스캔 파이프라인 에러
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 스캔 파이프라인 에러
///
/// 엔진 크레이트의 상세 에러가 이 분류로 변환됩니다.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// 지원하지 않는 프로바이더 요청 (사용자 입력 에러)
    #[error("unsupported providers: {0}")]
    UnsupportedProviders(String),

    /// 잘못된 finding 구성 (프로그래머 에러)
    #[error("invalid finding: {0}")]
    InvalidFinding(String),

    /// 프로바이더 자산 탐색 실패
    #[error("discovery failed: {0}")]
    Discovery(String),

    /// PII 규칙 로딩/컴파일 실패
    #[error("rule error: {0}")]
    Rule(String),

    /// 리포트 렌더링 실패
    #[error("report error: {0}")]
    Report(String),
}
