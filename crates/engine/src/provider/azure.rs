//! Azure Blob Storage 컨테이너 스캐너

use std::path::PathBuf;

use tracing::info;

use dspm_core::types::Provider;

use super::{InventorySource, ProviderScanner};
use crate::asset::StorageAsset;
use crate::error::EngineError;

/// Blob 컨테이너 스캐너
#[derive(Debug, Clone)]
pub struct AzureStorageScanner {
    source: InventorySource,
}

impl AzureStorageScanner {
    /// 샘플 컨테이너로 스캐너를 생성합니다.
    pub fn new() -> Self {
        Self {
            source: InventorySource::Sample,
        }
    }

    /// 주입된 컨테이너로 스캐너를 생성합니다. 빈 목록이면 샘플을 사용합니다.
    pub fn with_assets(containers: Vec<StorageAsset>) -> Self {
        Self {
            source: InventorySource::from_assets(containers),
        }
    }

    /// JSON 인벤토리 파일에서 컨테이너를 읽는 스캐너를 생성합니다.
    pub fn from_inventory_file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: InventorySource::File(path.into()),
        }
    }

    pub fn source(&self) -> &InventorySource {
        &self.source
    }
}

impl Default for AzureStorageScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderScanner for AzureStorageScanner {
    fn provider(&self) -> Provider {
        Provider::Azure
    }

    fn discover(&self) -> Result<Vec<StorageAsset>, EngineError> {
        let containers = self.source.load(Provider::Azure, sample_containers)?;
        info!(count = containers.len(), "discovered Azure containers");
        Ok(containers)
    }
}

fn sample_containers() -> Vec<StorageAsset> {
    vec![
        StorageAsset::new("analytics-raw", Provider::Azure)
            .with_encryption("MICROSOFT_MANAGED")
            .with_versioning(true)
            .with_policy("restricted")
            .with_region("australiaeast")
            .with_sample_content("Patient record: ICD-10 E11.9 diabetes, Medicare 9999 12345 1"),
        StorageAsset::new("public-media", Provider::Azure)
            .with_public(true)
            .with_versioning(false)
            .with_policy("allow-all")
            .with_region("australiasoutheast")
            .with_sample_content("Contact: john@example.com, Phone: 0412 345 678"),
    ]
}
