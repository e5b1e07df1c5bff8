//! Fuzz target: config file parsing and validation.
//!
//! Arbitrary JSON must either fail to parse or produce a config whose
//! validation result is stable.
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use greenhouse::config::SystemConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(cfg) = serde_json::from_slice::<SystemConfig>(data) else {
        return;
    };
    let first = cfg.validate().is_ok();
    assert_eq!(first, cfg.validate().is_ok());
});
