//! Integration tests for the mapping engine's public operations

use data_whisperer::{
    apply_transform, calculate_similarity, extract_field_paths, flatten, normalize_field_name,
    reshape, suggest_mappings, Correspondence, MappingEngine, TransformRegistry, DEFAULT_THRESHOLD,
};
use serde_json::{json, Value};
use std::collections::HashSet;

#[test]
fn test_normalization_idempotent() {
    let names = [
        "customerID",
        "customer_id",
        "Customer Name",
        "e-mail.Address",
        "createdAt2024",
        "ÄpfelCount",
        "__x__",
        "",
    ];

    for name in names {
        let once = normalize_field_name(name);
        assert_eq!(normalize_field_name(&once), once, "not idempotent for {:?}", name);
    }
}

#[test]
fn test_similarity_properties() {
    assert_eq!(calculate_similarity("customerID", "customer_id"), 1.0);
    assert!(calculate_similarity("customer_id", "customerId") > 0.8);
    assert!(calculate_similarity("created_at", "creation_date") >= 0.8);
    assert!(calculate_similarity("price", "zzz") < DEFAULT_THRESHOLD);
}

#[test]
fn test_extract_fields_example() {
    let engine = MappingEngine::default();
    let fields = engine
        .extract_fields(&json!({"user": {"name": "John", "id": 123}, "email": "x"}))
        .unwrap();

    assert_eq!(fields, vec!["email", "user.id", "user.name"]);
}

#[test]
fn test_extract_fields_with_arrays() {
    let doc = json!({
        "order": {
            "id": "o-1",
            "lines": [{"sku": "A", "qty": 1}, {"sku": "B", "qty": 3}],
            "notes": ["fragile"]
        }
    });

    assert_eq!(
        extract_field_paths(doc.as_object().unwrap()),
        vec!["order.id", "order.lines[].qty", "order.lines[].sku", "order.notes"]
    );
}

#[test]
fn test_suggest_mappings_example() {
    let source = ["customer_id", "full_name", "email_address"];
    let target = ["userId", "name", "email"];
    let mappings = suggest_mappings(&source, &target, DEFAULT_THRESHOLD);

    assert_eq!(mappings.len(), 3);

    let mut seen = HashSet::new();
    for mapping in mappings.iter().filter(|m| !m.target.is_empty()) {
        assert!(seen.insert(mapping.target.clone()), "{} used twice", mapping.target);
    }

    for pair in mappings.windows(2) {
        assert!(pair[0].confidence >= pair[1].confidence);
    }
}

#[test]
fn test_flatten_expands_everything() {
    let doc = json!({
        "a": {"b": [{"c": {"d": 1}, "e": [1, 2]}]},
        "f": [],
        "g": [{"h": [{"i": null}]}]
    });

    for (path, value) in flatten(doc.as_object().unwrap()) {
        assert!(!value.is_object(), "{} holds an object", path);
        if let Value::Array(items) = value {
            assert!(!items.first().is_some_and(Value::is_object), "{} holds objects", path);
        }
    }
}

#[test]
fn test_identity_reshape_round_trip() {
    let original = json!({
        "id": 1,
        "profile": {"name": "Ada", "address": {"city": "London", "zip": null}},
        "scores": [3, 5, 8],
        "active": false
    });

    let flat = flatten(original.as_object().unwrap());
    let identity: Vec<Correspondence> = flat
        .keys()
        .map(|p| Correspondence::new(p.as_str(), p.as_str()))
        .collect();

    let rebuilt = reshape(&flat, &identity, &TransformRegistry::new());
    let rebuilt_flat = flatten(&rebuilt);

    assert_eq!(rebuilt_flat, flat);
    assert_eq!(Value::Object(rebuilt), original);
}

#[test]
fn test_transform_null_propagation() {
    for name in ["lowercase", "uppercase", "trim", "to_string", "to_int", "nope"] {
        assert_eq!(apply_transform(&Value::Null, name), Value::Null);
    }
    assert_eq!(apply_transform(&json!("abc123"), "to_int"), json!(123));
    assert_eq!(apply_transform(&json!("none here"), "to_int"), json!(0));
}

#[test]
fn test_end_to_end_analyze_then_transform() {
    let engine = MappingEngine::default();
    let source = json!({
        "customer_id": "C-0042",
        "full_name": "  Grace Hopper ",
        "email_address": "grace@example.com"
    });
    let target = json!({"customerId": 0, "fullName": "", "email": ""});

    let source_fields = engine.extract_fields(&source).unwrap();
    let target_fields = engine.extract_fields(&target).unwrap();
    let mut mappings = engine.suggest_mappings(&source_fields, &target_fields, None);

    let targets: Vec<(&str, &str)> = mappings
        .iter()
        .map(|m| (m.source.as_str(), m.target.as_str()))
        .collect();
    assert_eq!(
        targets,
        vec![
            ("customer_id", "customerId"),
            ("full_name", "fullName"),
            ("email_address", "email"),
        ]
    );

    // the reviewer nests the output and attaches transforms before applying
    for mapping in &mut mappings {
        mapping.target = format!("user.{}", mapping.target);
        match mapping.source.as_str() {
            "customer_id" => mapping.transform = Some("to_int".to_string()),
            "full_name" => mapping.transform = Some("trim".to_string()),
            _ => {}
        }
    }

    let result = engine.transform_data(&source, &mappings).unwrap();
    assert_eq!(
        Value::Object(result),
        json!({"user": {"customerId": -42, "fullName": "Grace Hopper", "email": "grace@example.com"}})
    );
}

#[test]
fn test_export_excludes_unmatched() {
    let engine = MappingEngine::default();
    let mappings = vec![
        Correspondence::new("a", "x").with_confidence(1.0),
        Correspondence::unmatched("b"),
        Correspondence::new("", "y"),
    ];

    let config = engine.export_config(&mappings);
    let json = serde_json::to_value(&config).unwrap();

    assert_eq!(
        json,
        json!({
            "version": "1.0",
            "description": "Data Whisperer mapping configuration",
            "mappings": [{"source": "a", "target": "x", "transform": null}]
        })
    );
}
