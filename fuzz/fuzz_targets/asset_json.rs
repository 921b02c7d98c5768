#![no_main]

use dspm_core::types::Provider;
use dspm_engine::{MisconfigurationDetector, StorageAsset};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    if let Some(asset) = StorageAsset::from_value(&value) {
        let findings = MisconfigurationDetector::new().evaluate(asset.provider(), &[asset]);
        assert!(findings.len() <= 5);
    }
    let _ = Provider::from_str_loose(&value.to_string());
});
