//! Integration tests for lv-obfuscate.
//!
//! These tests verify:
//! - Canary identifiers never leak through the string pipeline
//! - Substitutes are consistent within a session and across engines
//! - Document structure survives obfuscation
//! - Mapping snapshots can be exported and restored

use lv_obfuscate::{
    Category, IpStyle, Mappings, NameStyle, Obfuscator, ObfuscatorConfig, SharedObfuscator, Value,
};
use serde_json::json;
use std::collections::BTreeSet;

/// Log lines paired with the identifier that must not survive.
const CANARY_LINES: &[(&str, &str)] = &[
    ("Connection accepted from 192.168.10.20:53422", "192.168.10.20"),
    ("user alice@corp.example.com logged in", "alice@corp.example.com"),
    ("ssn=123-45-6789", "123-45-6789"),
    ("card 4111 1111 1111 1111 charged", "4111 1111 1111 1111"),
    ("call +1-555-123-4567", "555-123-4567"),
    ("nic 00:1A:2B:3C:4D:5E up", "00:1A:2B:3C:4D:5E"),
    ("replicating from db1.prod.example.com", "db1.prod.example.com"),
    ("2024-06-15T10:00:00Z started", "2024-06-15"),
];

fn engine() -> Obfuscator {
    Obfuscator::new(ObfuscatorConfig::default()).unwrap()
}

#[test]
fn test_canaries_never_leak() {
    let mut engine = engine();
    for (line, canary) in CANARY_LINES {
        let out = engine.obfuscate_string(line);
        assert!(
            !out.contains(canary),
            "canary {:?} leaked: {:?} -> {:?}",
            canary,
            line,
            out
        );
    }
}

#[test]
fn test_known_line_outputs() {
    let mut engine = engine();
    assert_eq!(
        engine.obfuscate_string("Connection accepted from 192.168.10.20:53422"),
        "Connection accepted from 192.156.85.20:48987"
    );
    assert_eq!(engine.obfuscate_string("ssn=123-45-6789"), "ssn=193-56-7824");
    assert_eq!(
        engine.obfuscate_string("card 4111 1111 1111 1111 charged"),
        "card **** **** **** 1111 charged"
    );
    assert_eq!(
        engine.obfuscate_string("nic 00:1A:2B:3C:4D:5E up"),
        "nic 00:1A:2B:7C:E9:56 up"
    );
}

#[test]
fn test_port_rule_rewrites_time_fields() {
    // The first `:NN` is scaled everywhere it appears, timestamps included.
    let mut engine = engine();
    assert_eq!(
        engine.obfuscate_string("2024-06-15T10:00:00Z started"),
        "2024-05-03T10:0:0Z started"
    );
}

#[test]
fn test_consistent_within_session() {
    let mut engine = engine();
    let a = engine.obfuscate_string("a 10.1.2.3");
    let b = engine.obfuscate_string("b 10.1.2.3");
    assert_eq!(a, "a 10.115.6.3");
    assert_eq!(b, "b 10.115.6.3");
    assert_eq!(engine.store().len(Category::Ip), 1);
}

#[test]
fn test_deterministic_across_engines() {
    let mut first = engine();
    let mut second = engine();
    for (line, _) in CANARY_LINES {
        assert_eq!(first.obfuscate_string(line), second.obfuscate_string(line));
    }
}

#[test]
fn test_loopback_and_plain_text_pass_through() {
    let mut engine = engine();
    for line in [
        "listening on 127.0.0.1",
        "bind 0.0.0.0",
        "shutting down",
        "",
    ] {
        assert_eq!(engine.obfuscate_string(line), line);
    }
    assert!(engine.store().is_empty());
}

#[test]
fn test_mixed_identifiers_in_one_line() {
    let mut engine = engine();
    assert_eq!(
        engine.obfuscate_string("ssn 123-45-6789 card 4111-1111-1111-1234 mac 00-1a-2b-3c-4d-5e"),
        "ssn 193-56-7824 card ****-****-****-1234 mac 00-1a-2b-1D-18-AB"
    );
    assert_eq!(
        engine.obfuscate_string("phone (555) 123-4567 ext"),
        "phone (555) 122-3412 ext"
    );
}

#[test]
fn test_private_range_style() {
    let config = ObfuscatorConfig::default().with_ip_style(IpStyle::PrivateRange);
    let mut engine = Obfuscator::new(config).unwrap();
    assert_eq!(
        engine.obfuscate_string("peer 192.168.1.100 connected"),
        "peer 10.42.57.241 connected"
    );
}

#[test]
fn test_hash_prefixed_names() {
    let config = ObfuscatorConfig::default().with_name_style(NameStyle::HashPrefixed);
    let mut engine = Obfuscator::new(config).unwrap();
    let host = engine.obfuscate_host_port("db1.prod.example.com:27017");
    assert!(host.starts_with("host-"));
    assert!(host.ends_with(".local:27017"));
}

#[test]
fn test_json_document_structure_preserved() {
    let mut engine = engine();
    let doc = json!({
        "host": "db1.prod.example.com",
        "port": 27017,
        "members": ["10.0.0.5:27017", "10.0.0.6:27017"],
        "primary": true,
        "arbiter": null,
        "stats": {"count": 1, "size": 2048, "ratio": 0.5},
        "owner": "ops@example.com"
    });

    let out = engine.obfuscate_json(&doc);
    let map = out.as_object().unwrap();
    let keys: BTreeSet<&String> = map.keys().collect();
    let expected: BTreeSet<&String> = doc.as_object().unwrap().keys().collect();
    assert_eq!(keys, expected);

    assert_eq!(out["host"], json!("daisy.xiamen.com"));
    assert_eq!(out["port"], json!(24774));
    assert_eq!(
        out["members"],
        json!(["10.176.105.5:24774", "10.5.76.6:24774"])
    );
    assert_eq!(out["primary"], json!(true));
    assert_eq!(out["arbiter"], json!(null));
    assert_eq!(out["stats"]["count"], json!(1));
    assert_eq!(out["stats"]["size"], json!(1878));
    assert!((out["stats"]["ratio"].as_f64().unwrap() - 0.4585).abs() < 1e-9);
    assert!(!out["owner"].as_str().unwrap().contains("ops@example.com"));
}

#[test]
fn test_structured_log_field_order_kept() {
    let mut engine = engine();
    let line = r#"{"t":{"$date":"2024-06-15T10:00:00Z"},"s":"I","c":"NETWORK","msg":"x","attr":{"remote":"10.1.2.3"}}"#;
    let doc: serde_json::Value = serde_json::from_str(line).unwrap();

    let out = engine.obfuscate_json(&doc);
    let keys: Vec<&str> = out.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, ["t", "s", "c", "msg", "attr"]);
    assert_eq!(out["attr"]["remote"], json!("10.115.6.3"));
    assert!(out.to_string().starts_with(r#"{"t":{"$date":"2024-05-03"#));
}

#[test]
fn test_value_dispatch_matches_direct_calls() {
    let mut via_value = engine();
    let mut direct = engine();

    let value = Value::Sequence(vec![
        Value::from("10.1.2.3"),
        Value::from(500i64),
        Value::from(false),
    ]);
    let out = via_value.obfuscate_value(&value);
    let items = out.as_sequence().unwrap();

    assert_eq!(items.len(), 3);
    assert_eq!(items[0].as_str().unwrap(), direct.obfuscate_string("10.1.2.3"));
    assert_eq!(items[1], Value::Integer(direct.obfuscate_int(500)));
    assert_eq!(items[2], Value::from(false));
}

#[test]
fn test_mappings_export_restore() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mappings.json");

    let mut original = engine();
    let outputs: Vec<String> = CANARY_LINES
        .iter()
        .map(|(line, _)| original.obfuscate_string(line))
        .collect();
    original.mappings().save(&path).unwrap();

    let mappings = Mappings::load(&path).unwrap();
    assert!(mappings.exported_at.is_some());
    assert!(mappings.name_map.iter().all(|(k, v)| k != v));
    assert!(!mappings.ip_map.is_empty());

    let mut restored = engine();
    restored.restore(&mappings);
    assert!(!restored.store().is_empty());
    for ((line, _), expected) in CANARY_LINES.iter().zip(&outputs) {
        assert_eq!(&restored.obfuscate_string(line), expected);
    }
}

#[test]
fn test_overflowing_float_snapshot_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mappings.json");

    let config = ObfuscatorConfig::default().with_coefficient(2.0);
    let mut engine = Obfuscator::new(config.clone()).unwrap();
    assert_eq!(engine.obfuscate_float(1e308), f64::INFINITY);
    assert_eq!(engine.obfuscate_float(1.5), 3.0);
    engine.mappings().save(&path).unwrap();

    let mappings = Mappings::load(&path).unwrap();
    assert_eq!(mappings.number_map.len(), 1);

    let mut restored = Obfuscator::new(config).unwrap();
    restored.restore(&mappings);
    assert_eq!(restored.obfuscate_float(1.5), 3.0);
    assert_eq!(restored.obfuscate_float(1e308), f64::INFINITY);
}

#[test]
fn test_reset_starts_fresh_session() {
    let mut engine = engine();
    let before = engine.obfuscate_string("ssn=123-45-6789");
    engine.reset();
    assert!(engine.store().is_empty());
    assert_eq!(engine.obfuscate_string("ssn=123-45-6789"), before);
}

#[test]
fn test_shared_engine_matches_owned_engine() {
    let shared = SharedObfuscator::default();
    let mut owned = engine();
    for (line, _) in CANARY_LINES {
        assert_eq!(shared.obfuscate_string(line), owned.obfuscate_string(line));
    }
}
