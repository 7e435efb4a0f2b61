//! Fuzz target for engine config parsing.
//!
//! Tests that JSON and TOML config parsing handles arbitrary input without
//! panicking, and that anything accepted passes validation.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lv_obfuscate::ObfuscatorConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = ObfuscatorConfig::from_json(text) {
        assert!(config.validate().is_ok());
    }
    if let Ok(config) = ObfuscatorConfig::from_toml(text) {
        assert!(config.validate().is_ok());
    }
});
