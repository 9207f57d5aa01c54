//! Rebuild a nested target document from flattened source values.

use serde_json::{Map, Value};

use crate::assignment::Correspondence;
use crate::extraction::{Extractor, FieldPath, FlattenedDocument};
use crate::transform_registry::TransformRegistry;

/// Build the target document described by `mappings`.
///
/// Incomplete correspondences are skipped. A source path missing from the
/// flat document yields `null`. Target paths are split on `.`, array markers
/// are dropped, and intermediate objects are created as needed and shared
/// between mappings with a common prefix. Mappings are applied in order, so
/// the last write to a path wins.
pub fn reshape(
    source: &FlattenedDocument,
    mappings: &[Correspondence],
    registry: &TransformRegistry,
) -> Map<String, Value> {
    let mut result = Map::new();

    for mapping in mappings {
        if !mapping.is_complete() {
            tracing::trace!(source = %mapping.source, target = %mapping.target, "skipping incomplete mapping");
            continue;
        }

        let mut value = source.extract_or_null(&mapping.source);
        if let Some(name) = mapping.transform.as_deref().filter(|n| !n.is_empty()) {
            value = registry.apply(&value, name);
        }

        set_path(&mut result, &FieldPath::from_dotted(&mapping.target), value);
    }

    result
}

/// Set `value` at `path`, creating intermediate objects.
///
/// A non-object already sitting where an intermediate object is needed is
/// replaced by an empty object.
pub fn set_path(root: &mut Map<String, Value>, path: &FieldPath, value: Value) {
    let Some((last, parents)) = path.segments.split_last() else {
        return;
    };

    let mut current = root;
    for segment in parents {
        let slot = current
            .entry(segment.name().to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        current = match slot {
            Value::Object(map) => map,
            _ => unreachable!("slot was just made an object"),
        };
    }

    current.insert(last.name().to_string(), value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::flatten;
    use serde_json::json;

    fn flat(value: Value) -> FlattenedDocument {
        flatten(value.as_object().expect("object fixture"))
    }

    #[test]
    fn test_reshape_nested_targets() {
        let source = flat(json!({"customer_id": 7, "full_name": "Ada", "email": "a@x.io"}));
        let mappings = vec![
            Correspondence::new("customer_id", "user.id"),
            Correspondence::new("full_name", "user.name"),
            Correspondence::new("email", "contact.email"),
        ];

        let result = reshape(&source, &mappings, &TransformRegistry::new());
        assert_eq!(
            Value::Object(result),
            json!({"user": {"id": 7, "name": "Ada"}, "contact": {"email": "a@x.io"}})
        );
    }

    #[test]
    fn test_reshape_applies_transforms() {
        let source = flat(json!({"name": "  Ada ", "code": "ID-0042"}));
        let mappings = vec![
            Correspondence::new("name", "name").with_transform("trim"),
            Correspondence::new("code", "id").with_transform("to_int"),
            Correspondence::new("name", "raw").with_transform("bogus"),
        ];

        let result = reshape(&source, &mappings, &TransformRegistry::new());
        assert_eq!(result["name"], json!("Ada"));
        assert_eq!(result["id"], json!(-42));
        assert_eq!(result["raw"], json!("  Ada "));
    }

    #[test]
    fn test_reshape_skips_incomplete_and_nulls_missing() {
        let source = flat(json!({"a": 1}));
        let mappings = vec![
            Correspondence::unmatched("a"),
            Correspondence::new("", "b"),
            Correspondence::new("missing", "c").with_transform("uppercase"),
        ];

        let result = reshape(&source, &mappings, &TransformRegistry::new());
        assert_eq!(Value::Object(result), json!({"c": null}));
    }

    #[test]
    fn test_reshape_strips_array_markers() {
        let source = flat(json!({"lines": [{"sku": "A1"}], "tag": "x"}));
        let mappings = vec![
            Correspondence::new("lines[].sku", "order.items[].sku"),
            Correspondence::new("tag", "labels[]"),
        ];

        let result = reshape(&source, &mappings, &TransformRegistry::new());
        assert_eq!(
            Value::Object(result),
            json!({"order": {"items": {"sku": "A1"}}, "labels": "x"})
        );
    }

    #[test]
    fn test_reshape_last_write_wins() {
        let source = flat(json!({"a": 1, "b": 2}));
        let mappings = vec![
            Correspondence::new("a", "out.v"),
            Correspondence::new("b", "out.v"),
        ];

        let result = reshape(&source, &mappings, &TransformRegistry::new());
        assert_eq!(Value::Object(result), json!({"out": {"v": 2}}));
    }

    #[test]
    fn test_reshape_replaces_scalar_parent() {
        let source = flat(json!({"a": 1, "b": 2}));
        let mappings = vec![
            Correspondence::new("a", "user"),
            Correspondence::new("b", "user.id"),
        ];

        let result = reshape(&source, &mappings, &TransformRegistry::new());
        assert_eq!(Value::Object(result), json!({"user": {"id": 2}}));
    }

    #[test]
    fn test_identity_reshape_restores_leaves() {
        let original = json!({
            "user": {"name": "John", "id": 123, "tags": ["a", "b"]},
            "email": "j@x.io",
            "active": true,
            "deleted_at": null
        });
        let source = flat(original.clone());
        let mappings: Vec<Correspondence> = source
            .keys()
            .map(|path| Correspondence::new(path.clone(), path.clone()))
            .collect();

        let result = reshape(&source, &mappings, &TransformRegistry::new());
        assert_eq!(Value::Object(result), original);
    }
}
