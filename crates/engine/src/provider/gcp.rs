//! GCP Cloud Storage 버킷 스캐너

use std::path::PathBuf;

use tracing::info;

use dspm_core::types::Provider;

use super::{InventorySource, ProviderScanner};
use crate::asset::StorageAsset;
use crate::error::EngineError;

/// Cloud Storage 버킷 스캐너
#[derive(Debug, Clone)]
pub struct GcpStorageScanner {
    source: InventorySource,
}

impl GcpStorageScanner {
    /// 샘플 버킷으로 스캐너를 생성합니다.
    pub fn new() -> Self {
        Self {
            source: InventorySource::Sample,
        }
    }

    /// 주입된 버킷으로 스캐너를 생성합니다. 빈 목록이면 샘플을 사용합니다.
    pub fn with_assets(buckets: Vec<StorageAsset>) -> Self {
        Self {
            source: InventorySource::from_assets(buckets),
        }
    }

    /// JSON 인벤토리 파일에서 버킷을 읽는 스캐너를 생성합니다.
    pub fn from_inventory_file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: InventorySource::File(path.into()),
        }
    }

    pub fn source(&self) -> &InventorySource {
        &self.source
    }
}

impl Default for GcpStorageScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderScanner for GcpStorageScanner {
    fn provider(&self) -> Provider {
        Provider::Gcp
    }

    fn discover(&self) -> Result<Vec<StorageAsset>, EngineError> {
        let buckets = self.source.load(Provider::Gcp, sample_buckets)?;
        info!(count = buckets.len(), "discovered GCP buckets");
        Ok(buckets)
    }
}

fn sample_buckets() -> Vec<StorageAsset> {
    vec![
        StorageAsset::new("marketing-landing", Provider::Gcp)
            .with_public(true)
            .with_versioning(false)
            .with_policy("allUsers")
            .with_region("australia-southeast1")
            .with_sample_content("ABN: 51824753556, Email: marketing@example.com"),
        StorageAsset::new("backups", Provider::Gcp)
            .with_encryption("CMEK")
            .with_versioning(true)
            .with_policy("restricted")
            .with_region("australia-southeast2")
            .with_sample_content("Invoice: 12345, Card: 4000 0035 6000 0008"),
    ]
}
