//! Loading mapping files and applying them through the engine

use data_whisperer::{load_mappings, Correspondence, MappingEngine};
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_exported_json_config_drives_preview() {
    let engine = MappingEngine::default();
    let temp_dir = TempDir::new().unwrap();

    let accepted = vec![
        Correspondence::new("contact.mail", "email").with_transform("lowercase"),
        Correspondence::new("contact.phone", ""),
        Correspondence::new("lines[].qty", "items[].quantity").with_transform("to_int"),
    ];
    let config = engine.export_config(&accepted);
    assert_eq!(config.mappings.len(), 2);

    let path = temp_dir.path().join("mappings.json");
    fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

    let loaded = load_mappings(&path).unwrap();
    let source = json!({
        "contact": {"mail": "Ada@Example.COM", "phone": "555"},
        "lines": [{"qty": "3 units"}]
    });
    let result = engine.transform_data(&source, &loaded).unwrap();

    assert_eq!(
        Value::Object(result),
        json!({"email": "ada@example.com", "items": {"quantity": 3}})
    );
}

#[test]
fn test_bare_yaml_list() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("mappings.yml");
    fs::write(
        &path,
        "- source: a\n  target: b\n- source: c\n  target: d\n  transform: trim\n",
    )
    .unwrap();

    let loaded = load_mappings(&path).unwrap();
    assert_eq!(
        loaded,
        vec![
            Correspondence::new("a", "b"),
            Correspondence::new("c", "d").with_transform("trim"),
        ]
    );
}

#[test]
fn test_malformed_file_is_client_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.json");
    fs::write(&path, "[{\"source\": ").unwrap();

    let err = load_mappings(&path).unwrap_err();
    assert!(err.is_client_error());
}
