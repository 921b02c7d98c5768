//! 프로바이더 스캐너 -- S3, Blob Storage, Cloud Storage 자산 탐색
//!
//! [`ProviderScanner`] trait은 각 클라우드 프로바이더의 스캐너가 구현해야 하는 인터페이스입니다.
//! [`ProviderRegistry`]는 프로바이더 식별자로 스캐너를 선택합니다.
//!
//! # 자산 출처
//!
//! 각 스캐너는 다음 중 하나에서 자산을 읽습니다 ([`InventorySource`]):
//!
//! - 내장 샘플 인벤토리 (기본값)
//! - 주입된 자산 목록 (비어있으면 샘플로 대체)
//! - JSON 인벤토리 fixture 파일
//!
//! # 확장
//!
//! 새 백엔드를 지원하려면 `ProviderScanner` trait을 구현하고
//! [`ProviderRegistry::register`]로 등록합니다.

pub mod aws;
pub mod azure;
pub mod gcp;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use dspm_core::types::Provider;

use crate::asset::StorageAsset;
use crate::config::ScanConfig;
use crate::error::EngineError;

use self::aws::AwsStorageScanner;
use self::azure::AzureStorageScanner;
use self::gcp::GcpStorageScanner;

/// 프로바이더 스캐너 trait
///
/// 한 프로바이더의 스토리지 자산을 정규화된 [`StorageAsset`]으로 반환합니다.
/// 같은 백엔드 데이터에 대해 결과는 결정적이어야 하며,
/// 자산이 없는 경우는 에러가 아니라 빈 목록입니다.
pub trait ProviderScanner: Send + Sync {
    /// 이 스캐너가 담당하는 프로바이더를 반환합니다.
    fn provider(&self) -> Provider;

    /// 자산을 탐색합니다.
    ///
    /// 백엔드 실패 시 프로바이더 고유 에러를 반환하며, 오케스트레이터는 이를 그대로 전파합니다.
    fn discover(&self) -> Result<Vec<StorageAsset>, EngineError>;
}

/// 스캐너가 자산을 읽어오는 출처
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventorySource {
    /// 내장 샘플 인벤토리
    Sample,
    /// 주입된 자산 목록
    Assets(Vec<StorageAsset>),
    /// JSON 인벤토리 파일 (원시 자산 객체 배열)
    File(PathBuf),
}

impl InventorySource {
    /// 주입된 자산으로 출처를 만듭니다. 빈 목록이면 샘플 인벤토리를 사용합니다.
    pub fn from_assets(assets: Vec<StorageAsset>) -> Self {
        if assets.is_empty() {
            Self::Sample
        } else {
            Self::Assets(assets)
        }
    }

    /// 출처에서 자산을 읽습니다.
    ///
    /// `sample`은 샘플 인벤토리 생성 함수입니다. 파일에서 읽은 자산은
    /// `provider` 소속으로 재지정됩니다.
    pub(crate) fn load(
        &self,
        provider: Provider,
        sample: fn() -> Vec<StorageAsset>,
    ) -> Result<Vec<StorageAsset>, EngineError> {
        match self {
            Self::Sample => {
                debug!(provider = %provider, "loading sample inventory");
                Ok(sample())
            }
            Self::Assets(assets) => Ok(assets.clone()),
            Self::File(path) => load_inventory_file(path, provider),
        }
    }
}

/// JSON 인벤토리 파일을 읽어 자산 목록으로 변환합니다.
///
/// 파일은 원시 자산 객체의 배열이어야 합니다. 각 객체는
/// [`StorageAsset::from_value`]로 변환되고 `provider`로 재지정됩니다.
pub fn load_inventory_file(
    path: &Path,
    provider: Provider,
) -> Result<Vec<StorageAsset>, EngineError> {
    let path_str = path.display().to_string();

    let content = std::fs::read_to_string(path).map_err(|e| EngineError::InventoryLoad {
        path: path_str.clone(),
        reason: e.to_string(),
    })?;

    let value: Value = serde_json::from_str(&content).map_err(|e| EngineError::InventoryLoad {
        path: path_str.clone(),
        reason: format!("invalid JSON: {e}"),
    })?;

    let Value::Array(items) = value else {
        return Err(EngineError::InventoryLoad {
            path: path_str,
            reason: "expected a JSON array of asset objects".to_owned(),
        });
    };

    let mut assets = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let asset = StorageAsset::from_value(item).ok_or_else(|| EngineError::InventoryLoad {
            path: path_str.clone(),
            reason: format!("entry {index} is not an object"),
        })?;
        assets.push(asset.reassigned_to(provider));
    }

    debug!(path = %path_str, provider = %provider, count = assets.len(), "inventory file loaded");
    Ok(assets)
}

/// 프로바이더별 스캐너 레지스트리
///
/// 등록된 프로바이더 집합이 곧 스캔 가능한 프로바이더 집합입니다.
pub struct ProviderRegistry {
    scanners: BTreeMap<Provider, Box<dyn ProviderScanner>>,
}

impl ProviderRegistry {
    /// 빈 레지스트리를 생성합니다.
    pub fn empty() -> Self {
        Self {
            scanners: BTreeMap::new(),
        }
    }

    /// 세 프로바이더의 샘플 스캐너를 등록한 레지스트리를 생성합니다.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(AwsStorageScanner::new()));
        registry.register(Box::new(AzureStorageScanner::new()));
        registry.register(Box::new(GcpStorageScanner::new()));
        registry
    }

    /// 설정에 인벤토리 경로가 있으면 파일 기반 스캐너를, 없으면 샘플 스캐너를 등록합니다.
    pub fn from_config(config: &ScanConfig) -> Self {
        let mut registry = Self::with_defaults();
        for (provider, path) in &config.inventory_paths {
            let scanner: Box<dyn ProviderScanner> = match provider {
                Provider::Aws => Box::new(AwsStorageScanner::from_inventory_file(path)),
                Provider::Azure => Box::new(AzureStorageScanner::from_inventory_file(path)),
                Provider::Gcp => Box::new(GcpStorageScanner::from_inventory_file(path)),
            };
            registry.register(scanner);
        }
        registry
    }

    /// 스캐너를 등록합니다. 같은 프로바이더의 기존 스캐너는 교체됩니다.
    pub fn register(&mut self, scanner: Box<dyn ProviderScanner>) {
        self.scanners.insert(scanner.provider(), scanner);
    }

    /// 소문자 식별자로 스캐너를 조회합니다.
    pub fn get(&self, id: &str) -> Result<&dyn ProviderScanner, EngineError> {
        Provider::from_str_loose(id)
            .and_then(|p| self.scanners.get(&p))
            .map(|s| s.as_ref())
            .ok_or_else(|| EngineError::UnsupportedProvider(id.to_owned()))
    }

    /// 식별자가 등록된 프로바이더인지 확인합니다.
    pub fn supports(&self, id: &str) -> bool {
        Provider::from_str_loose(id).is_some_and(|p| self.scanners.contains_key(&p))
    }

    /// 등록된 프로바이더 목록 (정렬됨)
    pub fn providers(&self) -> Vec<Provider> {
        self.scanners.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.scanners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scanners.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    struct FailingScanner;

    impl ProviderScanner for FailingScanner {
        fn provider(&self) -> Provider {
            Provider::Gcp
        }

        fn discover(&self) -> Result<Vec<StorageAsset>, EngineError> {
            Err(EngineError::Discovery {
                provider: Provider::Gcp,
                reason: "quota exceeded".to_owned(),
            })
        }
    }

    #[test]
    fn default_registry_has_all_providers() {
        let registry = ProviderRegistry::with_defaults();
        assert_eq!(registry.providers(), Provider::ALL.to_vec());
        assert!(registry.supports("aws"));
        assert!(registry.supports("AZURE"));
        assert!(!registry.supports("oci"));
    }

    #[test]
    fn get_unknown_provider_fails() {
        let registry = ProviderRegistry::with_defaults();
        let err = registry.get("oci").err().unwrap();
        assert!(matches!(err, EngineError::UnsupportedProvider(ref p) if p == "oci"));
    }

    #[test]
    fn empty_registry_supports_nothing() {
        let registry = ProviderRegistry::empty();
        assert!(registry.is_empty());
        assert!(registry.get("aws").is_err());
    }

    #[test]
    fn register_replaces_existing_scanner() {
        let mut registry = ProviderRegistry::with_defaults();
        registry.register(Box::new(FailingScanner));
        assert_eq!(registry.len(), 3);
        let err = registry.get("gcp").unwrap().discover().unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn empty_injected_assets_fall_back_to_sample() {
        assert_eq!(InventorySource::from_assets(Vec::new()), InventorySource::Sample);
    }

    #[test]
    fn inventory_file_assets_are_reassigned() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name": "logs", "provider": "gcp", "public": "yes"}}, {{"name": "archive"}}]"#
        )
        .unwrap();

        let assets = load_inventory_file(file.path(), Provider::Azure).unwrap();
        assert_eq!(assets.len(), 2);
        assert!(assets.iter().all(|a| a.provider() == Provider::Azure));
        assert!(assets[0].is_public());
        assert_eq!(assets[1].name(), "archive");
    }

    #[test]
    fn inventory_file_missing_is_error() {
        let err = load_inventory_file(Path::new("/nonexistent/inventory.json"), Provider::Aws)
            .unwrap_err();
        assert!(matches!(err, EngineError::InventoryLoad { .. }));
    }

    #[test]
    fn inventory_file_must_be_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"name": "not-an-array"}}"#).unwrap();
        let err = load_inventory_file(file.path(), Provider::Aws).unwrap_err();
        assert!(err.to_string().contains("JSON array"));
    }

    #[test]
    fn inventory_file_rejects_non_object_entry() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"name": "ok"}}, 42]"#).unwrap();
        let err = load_inventory_file(file.path(), Provider::Aws).unwrap_err();
        assert!(err.to_string().contains("entry 1"));
    }

    #[test]
    fn empty_inventory_file_is_empty_not_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();
        let assets = load_inventory_file(file.path(), Provider::Gcp).unwrap();
        assert!(assets.is_empty());
    }

    #[test]
    fn registry_from_config_uses_inventory_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"name": "fixture-bucket"}}]"#).unwrap();

        let config = crate::config::ScanConfigBuilder::new()
            .inventory_path(Provider::Aws, file.path().display().to_string())
            .build()
            .unwrap();
        let registry = ProviderRegistry::from_config(&config);

        let aws = registry.get("aws").unwrap().discover().unwrap();
        assert_eq!(aws.len(), 1);
        assert_eq!(aws[0].name(), "fixture-bucket");

        // 경로가 없는 프로바이더는 샘플 유지
        let gcp = registry.get("gcp").unwrap().discover().unwrap();
        assert_eq!(gcp.len(), 2);
    }
}
