//! Fuzz target for document traversal.
//!
//! Parses arbitrary bytes as JSON and checks that obfuscation keeps the
//! document shape.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lv_obfuscate::Obfuscator;

fn same_shape(a: &serde_json::Value, b: &serde_json::Value) -> bool {
    use serde_json::Value;
    match (a, b) {
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|w| same_shape(v, w)))
        }
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(v, w)| same_shape(v, w))
        }
        (Value::String(_), Value::String(_)) => true,
        // Scaling can overflow a float to null
        (Value::Number(_), Value::Number(_) | Value::Null) => true,
        _ => a == b,
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(doc) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let mut engine = Obfuscator::default();
    let out = engine.obfuscate_json(&doc);
    assert!(same_shape(&doc, &out));
});
