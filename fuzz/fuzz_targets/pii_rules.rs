#![no_main]

use dspm_engine::{PiiDetector, PiiRuleLoader};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(json) = std::str::from_utf8(data) {
        // 파싱에 성공한 규칙은 컴파일까지 시도 (에러는 허용, 패닉은 불허)
        if let Ok(rules) = PiiRuleLoader::parse(json, "fuzz-input.json") {
            let _ = PiiDetector::new(rules);
        }
    }
});
