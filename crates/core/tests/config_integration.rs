//! dspm.toml 통합 설정 테스트
//!
//! - dspm.toml.example 파싱 테스트
//! - 부분 설정 로딩 테스트
//! - 환경변수 우선순위 테스트
//! - 파일 로딩 / 잘못된 형식 에러 테스트

use std::io::Write;

use dspm_core::config::DspmConfig;
use dspm_core::error::{ConfigError, DspmError};
use dspm_core::types::Provider;

// =============================================================================
// dspm.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../dspm.toml.example");
    let config = DspmConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "json");
    assert_eq!(config.scan.providers, vec!["aws", "azure", "gcp"]);
    assert!(config.scan.retain_lineage);
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../dspm.toml.example");
    let config = DspmConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

#[test]
fn example_config_matches_code_defaults() {
    let content = include_str!("../../../dspm.toml.example");
    let example = DspmConfig::parse(content).expect("should parse");
    let defaults = DspmConfig::default();

    assert_eq!(example.general.log_level, defaults.general.log_level);
    assert_eq!(example.general.log_format, defaults.general.log_format);
    assert_eq!(example.scan.providers, defaults.scan.providers);
    assert_eq!(example.scan.retain_lineage, defaults.scan.retain_lineage);
    assert_eq!(example.scan.fail_on_score, defaults.scan.fail_on_score);
    assert_eq!(example.pii.rules_path, defaults.pii.rules_path);
    assert_eq!(example.report.format, defaults.report.format);
    assert_eq!(example.report.output, defaults.report.output);
    for provider in Provider::ALL {
        assert_eq!(example.providers.inventory_path(provider), None);
    }
}

// =============================================================================
// 부분 설정 테스트
// =============================================================================

#[test]
fn partial_config_report_only() {
    let toml = r#"
[report]
format = "json"
output = "reports/dspm.json"
"#;
    let config = DspmConfig::parse(toml).expect("should parse");
    config.validate().expect("should validate");

    assert_eq!(config.report.format, "json");
    assert_eq!(config.report.output, "reports/dspm.json");
    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.scan.providers.len(), 3);
}

#[test]
fn partial_config_providers_only() {
    let toml = r#"
[providers]
gcp_inventory = "inventories/gcp.json"
"#;
    let config = DspmConfig::parse(toml).expect("should parse");
    assert_eq!(
        config.providers.inventory_path(Provider::Gcp),
        Some("inventories/gcp.json")
    );
    assert_eq!(config.providers.inventory_path(Provider::Aws), None);
}

// =============================================================================
// 환경변수 우선순위 테스트
// =============================================================================

#[test]
#[serial_test::serial]
fn env_override_takes_precedence_over_toml() {
    let toml = r#"
[scan]
providers = ["aws"]
fail_on_score = 50
"#;

    let original_providers = std::env::var("DSPM_SCAN_PROVIDERS").ok();
    let original_score = std::env::var("DSPM_SCAN_FAIL_ON_SCORE").ok();
    // SAFETY: serial 테스트로 실행되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("DSPM_SCAN_PROVIDERS", "gcp,azure");
        std::env::set_var("DSPM_SCAN_FAIL_ON_SCORE", "75");
    }

    let mut config = DspmConfig::parse(toml).expect("should parse");
    config.apply_env_overrides();
    let providers = config.scan.providers.clone();
    let score = config.scan.fail_on_score;

    // SAFETY: 테스트 정리
    unsafe {
        match original_providers {
            Some(val) => std::env::set_var("DSPM_SCAN_PROVIDERS", val),
            None => std::env::remove_var("DSPM_SCAN_PROVIDERS"),
        }
        match original_score {
            Some(val) => std::env::set_var("DSPM_SCAN_FAIL_ON_SCORE", val),
            None => std::env::remove_var("DSPM_SCAN_FAIL_ON_SCORE"),
        }
    }

    assert_eq!(providers, vec!["gcp", "azure"]);
    assert_eq!(score, 75);
}

#[test]
#[serial_test::serial]
fn env_override_bool_field() {
    let original = std::env::var("DSPM_SCAN_RETAIN_LINEAGE").ok();
    // SAFETY: serial 테스트로 실행되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("DSPM_SCAN_RETAIN_LINEAGE", "false");
    }

    let mut config = DspmConfig::default();
    config.apply_env_overrides();
    let result = config.scan.retain_lineage;

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("DSPM_SCAN_RETAIN_LINEAGE", val),
            None => std::env::remove_var("DSPM_SCAN_RETAIN_LINEAGE"),
        }
    }

    assert!(!result);
}

#[test]
#[serial_test::serial]
fn env_override_invalid_numeric_keeps_toml_value() {
    let toml = r#"
[scan]
fail_on_score = 40
"#;
    let original = std::env::var("DSPM_SCAN_FAIL_ON_SCORE").ok();
    // SAFETY: serial 테스트로 실행되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("DSPM_SCAN_FAIL_ON_SCORE", "very-high");
    }

    let mut config = DspmConfig::parse(toml).expect("should parse");
    config.apply_env_overrides();
    let result = config.scan.fail_on_score;

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("DSPM_SCAN_FAIL_ON_SCORE", val),
            None => std::env::remove_var("DSPM_SCAN_FAIL_ON_SCORE"),
        }
    }

    assert_eq!(result, 40);
}

// =============================================================================
// 파일 로딩 / 잘못된 형식 에러 테스트
// =============================================================================

#[test]
fn comments_only_parses_with_defaults() {
    let toml = r#"
# 주석만 있는 설정 파일
# 모든 값은 기본값
"#;
    let config = DspmConfig::parse(toml).expect("comments-only should parse");
    config.validate().expect("should validate");
    assert_eq!(config.general.log_level, "info");
}

#[test]
fn invalid_type_returns_parse_error() {
    let toml = r#"
[scan]
retain_lineage = "sometimes"
"#;
    let result = DspmConfig::parse(toml);
    assert!(matches!(
        result.unwrap_err(),
        DspmError::Config(ConfigError::ParseFailed { .. })
    ));
}

#[tokio::test]
async fn from_file_nonexistent_returns_file_not_found() {
    let result = DspmConfig::from_file("/tmp/dspm_test_nonexistent_12345.toml").await;
    assert!(matches!(
        result.unwrap_err(),
        DspmError::Config(ConfigError::FileNotFound { .. })
    ));
}

#[tokio::test]
async fn from_file_reads_temp_config() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        "[scan]\nproviders = [\"azure\"]\n\n[report]\nformat = \"json\""
    )
    .expect("write");

    let config = DspmConfig::from_file(file.path()).await.expect("should load");
    assert_eq!(config.scan.providers, vec!["azure"]);
    assert_eq!(config.report.format, "json");
}

#[tokio::test]
async fn from_file_rejects_invalid_values() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[scan]\nproviders = [\"aws\", \"oci\"]").expect("write");

    let err = DspmConfig::from_file(file.path()).await.unwrap_err();
    assert!(matches!(
        err,
        DspmError::Config(ConfigError::InvalidValue { .. })
    ));
    assert!(err.to_string().contains("oci"));
}

#[tokio::test]
#[serial_test::serial]
async fn load_example_config_from_disk() {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let example_path = format!("{}/../../dspm.toml.example", manifest_dir);

    let config = DspmConfig::load(&example_path)
        .await
        .expect("example config should load");
    assert_eq!(config.report.output, "dspm_report.md");
}
