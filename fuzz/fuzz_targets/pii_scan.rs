#![no_main]

use std::sync::OnceLock;

use dspm_core::types::Provider;
use dspm_engine::{PiiDetector, PiiRuleLoader, StorageAsset};
use libfuzzer_sys::fuzz_target;

static DETECTOR: OnceLock<PiiDetector> = OnceLock::new();

fn detector() -> &'static PiiDetector {
    DETECTOR.get_or_init(|| {
        let rules = PiiRuleLoader::parse(
            include_str!("../../config/pii_rules.json"),
            "config/pii_rules.json",
        )
        .expect("bundled rules must parse");
        PiiDetector::new(rules).expect("bundled rules must compile")
    })
}

fuzz_target!(|data: &[u8]| {
    let content = String::from_utf8_lossy(data);
    let asset = StorageAsset::new("fuzz-bucket", Provider::Aws).with_sample_content(content);
    for finding in detector().scan(Provider::Aws, std::slice::from_ref(&asset)) {
        assert!(!finding.sample.is_empty());
    }
});
