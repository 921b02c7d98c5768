//! 스캔 엔진 설정
//!
//! [`ScanConfig`]는 core의 [`DspmConfig`](dspm_core::config::DspmConfig)에서
//! 엔진이 사용하는 값만 추려 타입이 있는 형태로 보관합니다.
//!
//! # 사용 예시
//!
//! ```
//! use dspm_core::types::Provider;
//! use dspm_engine::ScanConfigBuilder;
//!
//! let config = ScanConfigBuilder::new()
//!     .providers(vec![Provider::Aws, Provider::Gcp])
//!     .retain_lineage(false)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.providers.len(), 2);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use dspm_core::config::DspmConfig;
use dspm_core::types::Provider;

use crate::error::EngineError;

/// 스캔 엔진 설정
///
/// # 필드
///
/// - **providers**: 요청이 비어있을 때 스캔할 기본 프로바이더
/// - **retain_lineage**: `scan` 호출 간 lineage 그래프 누적 여부
/// - **rules_path**: PII 규칙 JSON 파일 경로
/// - **inventory_paths**: 프로바이더별 인벤토리 fixture 경로 (없으면 샘플 데이터)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// 기본 스캔 대상 프로바이더
    pub providers: Vec<Provider>,
    /// lineage 그래프 누적 여부
    pub retain_lineage: bool,
    /// PII 규칙 파일 경로
    pub rules_path: String,
    /// 프로바이더별 인벤토리 fixture 경로
    pub inventory_paths: BTreeMap<Provider, String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            providers: Provider::ALL.to_vec(),
            retain_lineage: true,
            rules_path: "config/pii_rules.json".to_owned(),
            inventory_paths: BTreeMap::new(),
        }
    }
}

impl ScanConfig {
    /// core 설정에서 엔진 설정을 생성합니다.
    ///
    /// 인식할 수 없는 프로바이더 식별자는 건너뜁니다 (core 검증에서 이미 거부됨).
    pub fn from_core(core: &DspmConfig) -> Self {
        let mut providers: Vec<Provider> = Vec::new();
        for provider in core
            .scan
            .providers
            .iter()
            .filter_map(|p| Provider::from_str_loose(p))
        {
            if !providers.contains(&provider) {
                providers.push(provider);
            }
        }

        let inventory_paths = Provider::ALL
            .iter()
            .filter_map(|p| {
                core.providers
                    .inventory_path(*p)
                    .map(|path| (*p, path.to_owned()))
            })
            .collect();

        Self {
            providers,
            retain_lineage: core.scan.retain_lineage,
            rules_path: core.pii.rules_path.clone(),
            inventory_paths,
        }
    }

    /// 설정 값의 유효성을 검증합니다.
    ///
    /// # 검증 규칙
    ///
    /// - `providers`: 하나 이상
    /// - `rules_path`: 비어있으면 안 됨
    /// - `inventory_paths`: 등록된 경로는 비어있으면 안 됨
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.providers.is_empty() {
            return Err(EngineError::Config {
                field: "providers".to_owned(),
                reason: "at least one provider is required".to_owned(),
            });
        }

        if self.rules_path.trim().is_empty() {
            return Err(EngineError::Config {
                field: "rules_path".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        if let Some((provider, _)) = self
            .inventory_paths
            .iter()
            .find(|(_, path)| path.trim().is_empty())
        {
            return Err(EngineError::Config {
                field: format!("inventory_paths.{provider}"),
                reason: "must not be empty".to_owned(),
            });
        }

        Ok(())
    }

    /// 프로바이더의 인벤토리 fixture 경로를 반환합니다.
    pub fn inventory_path(&self, provider: Provider) -> Option<&str> {
        self.inventory_paths.get(&provider).map(String::as_str)
    }
}

/// [`ScanConfig`] 빌더
///
/// 빌드 시 유효성을 검증합니다.
#[derive(Default)]
pub struct ScanConfigBuilder {
    config: ScanConfig,
}

impl ScanConfigBuilder {
    /// 기본값을 가진 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 기본 프로바이더 목록을 설정합니다.
    pub fn providers(mut self, providers: Vec<Provider>) -> Self {
        self.config.providers = providers;
        self
    }

    /// lineage 누적 여부를 설정합니다.
    pub fn retain_lineage(mut self, retain: bool) -> Self {
        self.config.retain_lineage = retain;
        self
    }

    /// PII 규칙 파일 경로를 설정합니다.
    pub fn rules_path(mut self, path: impl Into<String>) -> Self {
        self.config.rules_path = path.into();
        self
    }

    /// 프로바이더의 인벤토리 fixture 경로를 설정합니다.
    pub fn inventory_path(mut self, provider: Provider, path: impl Into<String>) -> Self {
        self.config.inventory_paths.insert(provider, path.into());
        self
    }

    /// 설정을 검증하고 빌드합니다.
    ///
    /// # Errors
    ///
    /// 유효성 검증 실패 시 `EngineError::Config` 반환
    pub fn build(self) -> Result<ScanConfig, EngineError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
