//! Fuzz target for the string pipeline.
//!
//! Every category rule runs on arbitrary text under an arbitrary engine
//! config; none of them may panic, and a repeated line must come back the
//! same.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lv_obfuscate::{IpStyle, NameStyle, Obfuscator, ObfuscatorConfig};

#[derive(Arbitrary, Debug)]
struct Input {
    coefficient: f64,
    date_offset_days: i16,
    private_range: bool,
    hash_prefixed: bool,
    lines: Vec<String>,
}

fuzz_target!(|input: Input| {
    let config = ObfuscatorConfig::default()
        .with_coefficient(input.coefficient)
        .with_date_offset_days(i64::from(input.date_offset_days))
        .with_ip_style(if input.private_range {
            IpStyle::PrivateRange
        } else {
            IpStyle::KeepEnds
        })
        .with_name_style(if input.hash_prefixed {
            NameStyle::HashPrefixed
        } else {
            NameStyle::Readable
        });

    // Invalid configs are rejected up front
    let Ok(mut engine) = Obfuscator::new(config) else {
        return;
    };

    for line in &input.lines {
        let first = engine.obfuscate_string(line);
        let second = engine.obfuscate_string(line);
        assert_eq!(first, second);
    }
});
