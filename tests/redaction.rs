//! Redaction Tests
//!
//! Payloads redacted before logging keep their shape but lose their content:
//! - Keys and nesting are untouched
//! - Mask and hash preserve the textual length of every leaf
//! - Obfuscation preserves case pattern, digits and whitespace layout

use paramform::redact::{self, HashAlgorithm, Redaction};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn purchase_request() -> Value {
    json!({
        "store_id": "store5",
        "api_token": "yesguy",
        "purchase": {
            "order_id": "ord-1",
            "pan": "4242424242424242",
            "expdate": "2612",
            "amount": "12.30",
            "cust_info": { "first_name": "Ada Lovelace", "phone": "555 0100" },
            "items": [{ "quantity": 2, "gift": true }]
        }
    })
}

fn collect_strings(tree: &Value, out: &mut Vec<String>) {
    match tree {
        Value::Object(map) => map.values().for_each(|v| collect_strings(v, out)),
        Value::Array(items) => items.iter().for_each(|v| collect_strings(v, out)),
        Value::String(s) => out.push(s.clone()),
        _ => {}
    }
}

// =============================================================================
// Shape Tests
// =============================================================================

/// Every strategy keeps keys and nesting.
#[test]
fn test_strategies_keep_keys() {
    let request = purchase_request();
    for redaction in [
        Redaction::Mask('*'),
        Redaction::Hash(HashAlgorithm::Sha512),
        Redaction::Obfuscate,
    ] {
        let out = redaction.apply(&request);
        let keys: Vec<&String> = out["purchase"].as_object().unwrap().keys().collect();
        let original: Vec<&String> = request["purchase"].as_object().unwrap().keys().collect();
        assert_eq!(keys, original);
        assert!(out["purchase"]["items"].is_array());
    }
}

/// No original string survives masking.
#[test]
fn test_mask_hides_every_value() {
    let masked = redact::mask(&purchase_request(), '*');
    let mut strings = Vec::new();
    collect_strings(&masked, &mut strings);
    assert!(strings.iter().all(|s| s.chars().all(|c| c == '*')));
    assert_eq!(masked["purchase"]["pan"], "*".repeat(16));
}

/// Hashing is deterministic and length preserving.
#[test]
fn test_hash_is_stable() {
    let first = redact::hash(&purchase_request(), HashAlgorithm::Sha256);
    let second = redact::hash(&purchase_request(), HashAlgorithm::Sha256);
    assert_eq!(first, second);
    assert_eq!(first["purchase"]["expdate"].as_str().unwrap().len(), 4);
    assert_ne!(first["purchase"]["expdate"], "2612");
}

/// Obfuscation keeps the look of the data.
#[test]
fn test_obfuscate_keeps_layout() {
    let out = redact::obfuscate(&purchase_request());
    assert_eq!(out["purchase"]["cust_info"]["first_name"], "Xxx Xxxxxxxx");
    assert_eq!(out["purchase"]["cust_info"]["phone"], "999 9999");
    assert_eq!(out["purchase"]["order_id"], "xxx-9");
    assert_eq!(out["purchase"]["items"][0]["quantity"], json!(9));
    assert_eq!(out["purchase"]["items"][0]["gift"], json!(true));
}

// =============================================================================
// Selective Redaction Tests
// =============================================================================

/// Only named paths are redacted; the rest stays readable.
#[test]
fn test_redact_selected_paths() {
    let mut request = purchase_request();
    let failures = redact::redact_paths(
        &mut request,
        ["api_token", "purchase.pan", "purchase.cvd"],
        Redaction::default(),
    );

    assert_eq!(request["api_token"], "******");
    assert_eq!(request["purchase"]["pan"], "*".repeat(16));
    assert_eq!(request["purchase"]["order_id"], "ord-1");
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].path(), "purchase.cvd");
}

/// Redacting a subtree reaches all of its leaves.
#[test]
fn test_redact_subtree() {
    let mut request = purchase_request();
    redact::redact_paths(&mut request, ["purchase.cust_info"], Redaction::Mask('#'));

    assert_eq!(request["purchase"]["cust_info"]["first_name"], "############");
    assert_eq!(request["purchase"]["cust_info"]["phone"], "########");
}
