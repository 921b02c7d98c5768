//! 설정 관리 -- dspm.toml 파싱 및 런타임 설정
//!
//! [`DspmConfig`]는 스캐너, PII 규칙, 리포트, API, 로깅 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`DSPM_PII_RULES_PATH=/etc/dspm/pii_rules.json` 형식)
//! 3. 설정 파일 (`dspm.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), dspm_core::error::DspmError> {
//! use dspm_core::config::DspmConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = DspmConfig::load("dspm.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = DspmConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, DspmError};
use crate::types::Provider;

/// DSPM 통합 설정
///
/// `dspm.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DspmConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 스캔 설정
    #[serde(default)]
    pub scan: ScanSection,
    /// PII 규칙 설정
    #[serde(default)]
    pub pii: PiiConfig,
    /// 프로바이더별 인벤토리 설정
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// 리포트 설정
    #[serde(default)]
    pub report: ReportConfig,
    /// HTTP API 설정
    #[serde(default)]
    pub api: ApiConfig,
}

impl DspmConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DspmError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일이 없으면 기본값을 사용해 로드합니다.
    ///
    /// 파일이 존재하지만 파싱에 실패하면 에러를 반환합니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, DspmError> {
        let path = path.as_ref();
        let mut config = match Self::from_file(path).await {
            Ok(config) => config,
            Err(DspmError::Config(ConfigError::FileNotFound { .. })) => {
                tracing::debug!(path = %path.display(), "config file not found, using defaults");
                Self::default()
            }
            Err(e) => return Err(e),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, DspmError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DspmError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                DspmError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, DspmError> {
        toml::from_str(toml_str).map_err(|e| {
            DspmError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `DSPM_{SECTION}_{FIELD}`
    /// 예: `DSPM_SCAN_PROVIDERS=aws,gcp`
    ///
    /// `DSPM_LOG_LEVEL`은 `DSPM_GENERAL_LOG_LEVEL`의 축약형이며, 둘 다 있으면 후자가 우선합니다.
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "DSPM_LOG_LEVEL");
        override_string(&mut self.general.log_level, "DSPM_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "DSPM_GENERAL_LOG_FORMAT");

        // Scan
        override_csv(&mut self.scan.providers, "DSPM_SCAN_PROVIDERS");
        override_bool(&mut self.scan.retain_lineage, "DSPM_SCAN_RETAIN_LINEAGE");
        override_u32(&mut self.scan.fail_on_score, "DSPM_SCAN_FAIL_ON_SCORE");

        // PII
        override_string(&mut self.pii.rules_path, "DSPM_PII_RULES_PATH");

        // Providers
        override_string(
            &mut self.providers.aws_inventory,
            "DSPM_PROVIDERS_AWS_INVENTORY",
        );
        override_string(
            &mut self.providers.azure_inventory,
            "DSPM_PROVIDERS_AZURE_INVENTORY",
        );
        override_string(
            &mut self.providers.gcp_inventory,
            "DSPM_PROVIDERS_GCP_INVENTORY",
        );

        // Report
        override_string(&mut self.report.format, "DSPM_REPORT_FORMAT");
        override_string(&mut self.report.output, "DSPM_REPORT_OUTPUT");

        // API
        override_string(&mut self.api.listen_addr, "DSPM_API_LISTEN_ADDR");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), DspmError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.scan.providers.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "scan.providers".to_owned(),
                reason: "at least one provider is required".to_owned(),
            }
            .into());
        }

        let mut unknown: Vec<&str> = self
            .scan
            .providers
            .iter()
            .map(String::as_str)
            .filter(|p| Provider::from_str_loose(p).is_none())
            .collect();
        if !unknown.is_empty() {
            unknown.sort_unstable();
            return Err(ConfigError::InvalidValue {
                field: "scan.providers".to_owned(),
                reason: format!(
                    "unsupported providers: {} (expected: aws, azure, gcp)",
                    unknown.join(", ")
                ),
            }
            .into());
        }

        if self.scan.fail_on_score > 100 {
            return Err(ConfigError::InvalidValue {
                field: "scan.fail_on_score".to_owned(),
                reason: "must be 0 (disabled) or 1-100".to_owned(),
            }
            .into());
        }

        let valid_report_formats = ["markdown", "json"];
        if !valid_report_formats.contains(&self.report.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "report.format".to_owned(),
                reason: format!("must be one of: {}", valid_report_formats.join(", ")),
            }
            .into());
        }

        if self.report.output.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "report.output".to_owned(),
                reason: "output path must not be empty".to_owned(),
            }
            .into());
        }

        if self.api.listen_addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::InvalidValue {
                field: "api.listen_addr".to_owned(),
                reason: format!("'{}' is not a socket address", self.api.listen_addr),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 스캔 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSection {
    /// 기본 스캔 대상 프로바이더 (CLI 인자가 없을 때 사용)
    pub providers: Vec<String>,
    /// 스캔 호출 간 lineage 그래프 유지 여부
    pub retain_lineage: bool,
    /// 이 점수 이상이면 CLI가 실패 코드로 종료 (0이면 비활성)
    pub fail_on_score: u32,
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            providers: Provider::ALL.iter().map(|p| p.as_str().to_owned()).collect(),
            retain_lineage: true,
            fail_on_score: 0,
        }
    }
}

/// PII 규칙 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PiiConfig {
    /// PII 규칙 JSON 파일 경로 (없으면 내장 규칙 사용)
    pub rules_path: String,
}

impl Default for PiiConfig {
    fn default() -> Self {
        Self {
            rules_path: "config/pii_rules.json".to_owned(),
        }
    }
}

/// 프로바이더별 인벤토리 설정
///
/// 빈 문자열이면 해당 프로바이더의 내장 샘플 인벤토리를 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// AWS 인벤토리 JSON 경로
    pub aws_inventory: String,
    /// Azure 인벤토리 JSON 경로
    pub azure_inventory: String,
    /// GCP 인벤토리 JSON 경로
    pub gcp_inventory: String,
}

impl ProvidersConfig {
    /// 프로바이더의 인벤토리 경로를 반환합니다 (설정되지 않았으면 `None`).
    pub fn inventory_path(&self, provider: Provider) -> Option<&str> {
        let path = match provider {
            Provider::Aws => &self.aws_inventory,
            Provider::Azure => &self.azure_inventory,
            Provider::Gcp => &self.gcp_inventory,
        };
        if path.is_empty() { None } else { Some(path) }
    }
}

/// 리포트 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// 리포트 형식 (markdown, json)
    pub format: String,
    /// 리포트 출력 경로
    pub output: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: "markdown".to_owned(),
            output: "dspm_report.md".to_owned(),
        }
    }
}

/// HTTP API 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// 바인드 주소 (`host:port`)
    pub listen_addr: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_u32(target: &mut u32, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u32>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u32 from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn default_config_has_sane_values() {
        let config = DspmConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, "json");
        assert_eq!(config.scan.providers, vec!["aws", "azure", "gcp"]);
        assert!(config.scan.retain_lineage);
        assert_eq!(config.scan.fail_on_score, 0);
        assert_eq!(config.pii.rules_path, "config/pii_rules.json");
        assert_eq!(config.report.format, "markdown");
        assert_eq!(config.api.listen_addr, "127.0.0.1:8080");
    }

    #[test]
    fn default_config_passes_validation() {
        DspmConfig::default().validate().unwrap();
    }

    #[test]
    fn parse_empty_toml_uses_defaults() {
        let config = DspmConfig::parse("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.scan.providers.len(), 3);
    }

    #[test]
    fn parse_partial_toml_merges_with_defaults() {
        let toml = r#"
[general]
log_level = "debug"

[scan]
providers = ["gcp"]
"#;
        let config = DspmConfig::parse(toml).unwrap();
        assert_eq!(config.general.log_level, "debug");
        // log_format은 기본값 유지
        assert_eq!(config.general.log_format, "json");
        assert_eq!(config.scan.providers, vec!["gcp"]);
        assert!(config.scan.retain_lineage);
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
[general]
log_level = "warn"
log_format = "pretty"

[scan]
providers = ["aws", "azure"]
retain_lineage = false
fail_on_score = 80

[pii]
rules_path = "/etc/dspm/pii_rules.json"

[providers]
aws_inventory = "/var/lib/dspm/aws.json"

[report]
format = "json"
output = "out/report.json"

[api]
listen_addr = "0.0.0.0:9090"
"#;
        let config = DspmConfig::parse(toml).unwrap();
        assert_eq!(config.general.log_format, "pretty");
        assert!(!config.scan.retain_lineage);
        assert_eq!(config.scan.fail_on_score, 80);
        assert_eq!(config.pii.rules_path, "/etc/dspm/pii_rules.json");
        assert_eq!(
            config.providers.inventory_path(Provider::Aws),
            Some("/var/lib/dspm/aws.json")
        );
        assert_eq!(config.providers.inventory_path(Provider::Gcp), None);
        assert_eq!(config.report.format, "json");
        assert_eq!(config.api.listen_addr, "0.0.0.0:9090");
        config.validate().unwrap();
    }

    #[test]
    fn parse_invalid_toml_returns_error() {
        let err = DspmConfig::parse("invalid = [[[toml").unwrap_err();
        assert!(matches!(
            err,
            DspmError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = DspmConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_invalid_log_format() {
        let mut config = DspmConfig::default();
        config.general.log_format = "xml".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_format"));
    }

    #[test]
    fn validate_rejects_unknown_providers_sorted() {
        let mut config = DspmConfig::default();
        config.scan.providers = vec!["oci".to_owned(), "aws".to_owned(), "alibaba".to_owned()];
        let msg = config.validate().unwrap_err().to_string();
        assert!(msg.contains("scan.providers"));
        assert!(msg.contains("alibaba, oci"));
    }

    #[test]
    fn validate_accepts_mixed_case_providers() {
        let mut config = DspmConfig::default();
        config.scan.providers = vec!["AWS".to_owned(), "Gcp".to_owned()];
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_empty_providers() {
        let mut config = DspmConfig::default();
        config.scan.providers.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_fail_on_score_above_100() {
        let mut config = DspmConfig::default();
        config.scan.fail_on_score = 101;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("fail_on_score"));
    }

    #[test]
    fn validate_rejects_unknown_report_format() {
        let mut config = DspmConfig::default();
        config.report.format = "html".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("report.format"));
    }

    #[test]
    fn validate_rejects_bad_listen_addr() {
        let mut config = DspmConfig::default();
        config.api.listen_addr = "localhost".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("api.listen_addr"));
    }

    #[test]
    #[serial]
    fn env_override_string() {
        let mut val = "original".to_owned();
        // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_DSPM_STR", "overridden") };
        override_string(&mut val, "TEST_DSPM_STR");
        assert_eq!(val, "overridden");
        unsafe { std::env::remove_var("TEST_DSPM_STR") };
    }

    #[test]
    #[serial]
    fn env_override_bool_invalid_keeps_original() {
        let mut val = true;
        // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_DSPM_BOOL_BAD", "not-a-bool") };
        override_bool(&mut val, "TEST_DSPM_BOOL_BAD");
        assert!(val);
        unsafe { std::env::remove_var("TEST_DSPM_BOOL_BAD") };
    }

    #[test]
    #[serial]
    fn env_override_csv_skips_blank_entries() {
        let mut val = vec!["aws".to_owned()];
        // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_DSPM_CSV", "gcp, ,azure") };
        override_csv(&mut val, "TEST_DSPM_CSV");
        assert_eq!(val, vec!["gcp", "azure"]);
        unsafe { std::env::remove_var("TEST_DSPM_CSV") };
    }

    #[test]
    #[serial]
    fn env_log_level_alias_and_full_key() {
        let mut config = DspmConfig::default();
        // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("DSPM_LOG_LEVEL", "debug") };
        config.apply_env_overrides();
        assert_eq!(config.general.log_level, "debug");

        unsafe { std::env::set_var("DSPM_GENERAL_LOG_LEVEL", "warn") };
        config.apply_env_overrides();
        assert_eq!(config.general.log_level, "warn");

        unsafe {
            std::env::remove_var("DSPM_LOG_LEVEL");
            std::env::remove_var("DSPM_GENERAL_LOG_LEVEL");
        }
    }

    #[test]
    fn env_override_missing_var_keeps_original() {
        let mut val = 42;
        override_u32(&mut val, "TEST_DSPM_NONEXISTENT_12345");
        assert_eq!(val, 42);
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = DspmConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = DspmConfig::parse(&toml_str).unwrap();
        assert_eq!(config.general.log_level, parsed.general.log_level);
        assert_eq!(config.scan.providers, parsed.scan.providers);
        assert_eq!(config.pii.rules_path, parsed.pii.rules_path);
    }

    #[tokio::test]
    async fn from_file_not_found() {
        let err = DspmConfig::from_file("/nonexistent/path/dspm.toml")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DspmError::Config(ConfigError::FileNotFound { .. })
        ));
    }

    #[tokio::test]
    #[serial]
    async fn load_or_default_without_file_uses_defaults() {
        let config = DspmConfig::load_or_default("/nonexistent/path/dspm.toml")
            .await
            .unwrap();
        assert_eq!(config.report.output, "dspm_report.md");
    }
}
