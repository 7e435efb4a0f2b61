//! Fuzz target for mapping snapshot restore.
//!
//! A snapshot may come from another machine; restoring it must never panic
//! and the engine must keep working afterwards.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lv_obfuscate::{Mappings, Obfuscator};

fuzz_target!(|data: &[u8]| {
    let Ok(mappings) = serde_json::from_slice::<Mappings>(data) else {
        return;
    };
    let mut engine = Obfuscator::default();
    engine.restore(&mappings);
    let _ = engine.obfuscate_string("10.1.2.3 user@example.com 123-45-6789");
    let _ = engine.mappings();
});
