//! AWS S3 버킷 스캐너

use std::path::PathBuf;

use tracing::info;

use dspm_core::types::Provider;

use super::{InventorySource, ProviderScanner};
use crate::asset::StorageAsset;
use crate::error::EngineError;

/// S3 버킷 스캐너
///
/// 실제 API 호출 없이 샘플/주입/파일 인벤토리에서 버킷을 읽습니다.
#[derive(Debug, Clone)]
pub struct AwsStorageScanner {
    source: InventorySource,
}

impl AwsStorageScanner {
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

impl Default for AwsStorageScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderScanner for AwsStorageScanner {
    fn provider(&self) -> Provider {
        Provider::Aws
    }

    fn discover(&self) -> Result<Vec<StorageAsset>, EngineError> {
        let buckets = self.source.load(Provider::Aws, sample_buckets)?;
        info!(count = buckets.len(), "discovered AWS buckets");
        Ok(buckets)
    }
}

fn sample_buckets() -> Vec<StorageAsset> {
    vec![
        StorageAsset::new("finance-uploads", Provider::Aws)
            .with_encryption("AES256")
            .with_versioning(true)
            .with_policy("restricted")
            .with_region("ap-southeast-2")
            .with_sample_content(
                "Customer: Jane Doe, DOB: 1988-01-01, Medicare: 1234 56789 1, TFN: 123 456 789",
            ),
        StorageAsset::new("legacy-public-assets", Provider::Aws)
            .with_public(true)
            .with_versioning(false)
            .with_policy("allow-all")
            .with_region("ap-southeast-2")
            .with_sample_content("CC: 4111 1111 1111 1111, BSB: 123-456 Account: 12345678"),
    ]
}
