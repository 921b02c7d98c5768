#![no_main]

use dspm_core::config::DspmConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(toml_str) = std::str::from_utf8(data) {
        if let Ok(config) = DspmConfig::parse(toml_str) {
            let _ = config.validate();
        }
    }
});
