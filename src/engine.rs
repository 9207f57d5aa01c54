//! Mapping engine facade.
//!
//! `MappingEngine` exposes the engine's operations over plain JSON values and
//! the request/response shapes used by the CLI and HTTP front ends:
//!
//! - `analyze`: extract fields of both documents and suggest mappings
//! - `preview`: reshape a source document with a mapping list
//! - `export`: package accepted mappings as a configuration

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::assignment::{Correspondence, MappingAssigner};
use crate::config::{EngineConfig, MappingConfig};
use crate::error::{MapperError, Result};
use crate::extraction::{extract_field_paths, flatten};
use crate::reshape::reshape;
use crate::similarity::SimilarityScorer;
use crate::transform_registry::TransformRegistry;

pub const APP_NAME: &str = "Data Whisperer";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub source_json: Option<Value>,
    #[serde(default)]
    pub target_json: Option<Value>,
    /// Overrides the engine's configured threshold
    #[serde(default)]
    pub threshold: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    pub source_fields: Vec<String>,
    pub target_fields: Vec<String>,
    pub mappings: Vec<Correspondence>,
    pub success: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub source_json: Option<Value>,
    #[serde(default)]
    pub mappings: Vec<Correspondence>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewResponse {
    pub transformed: Map<String, Value>,
    pub success: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub mappings: Vec<Correspondence>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportResponse {
    pub config: MappingConfig,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub app: &'static str,
}

/// Suggests and applies field mappings between JSON documents
#[derive(Debug, Clone, Default)]
pub struct MappingEngine {
    config: EngineConfig,
    assigner: MappingAssigner,
    registry: TransformRegistry,
}

impl MappingEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_scorer(config, SimilarityScorer::default())
    }

    pub fn with_scorer(config: EngineConfig, scorer: SimilarityScorer) -> Self {
        let assigner = MappingAssigner::new(scorer).with_threshold(config.threshold);
        Self {
            config,
            assigner,
            registry: TransformRegistry::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &TransformRegistry {
        &self.registry
    }

    /// Sorted field paths of a JSON object.
    pub fn extract_fields(&self, document: &Value) -> Result<Vec<String>> {
        Ok(extract_field_paths(as_object(document, "document")?))
    }

    /// Ranked suggestions; `threshold` defaults to the configured one.
    pub fn suggest_mappings<S, T>(
        &self,
        source_fields: &[S],
        target_fields: &[T],
        threshold: Option<f64>,
    ) -> Vec<Correspondence>
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        match threshold {
            Some(threshold) => self
                .assigner
                .clone()
                .with_threshold(threshold)
                .suggest(source_fields, target_fields),
            None => self.assigner.suggest(source_fields, target_fields),
        }
    }

    /// Reshape `source` into the structure described by `mappings`.
    pub fn transform_data(
        &self,
        source: &Value,
        mappings: &[Correspondence],
    ) -> Result<Map<String, Value>> {
        let flat = flatten(as_object(source, "source document")?);
        Ok(reshape(&flat, mappings, &self.registry))
    }

    /// Package complete mappings as an exportable configuration.
    pub fn export_config(&self, mappings: &[Correspondence]) -> MappingConfig {
        MappingConfig::from_mappings(self.config.description.clone(), mappings)
    }

    pub fn analyze(&self, request: AnalyzeRequest) -> Result<AnalyzeResponse> {
        let (source, target) = match (
            present(request.source_json),
            present(request.target_json),
        ) {
            (Some(source), Some(target)) => (source, target),
            _ => {
                return Err(MapperError::ValidationError(
                    "Both source_json and target_json are required".to_string(),
                ))
            }
        };

        let source = resolve_document(source)?;
        let target = resolve_document(target)?;

        let source_fields = self.extract_fields(&source)?;
        let target_fields = self.extract_fields(&target)?;
        let mappings = self.suggest_mappings(&source_fields, &target_fields, request.threshold);

        tracing::debug!(
            "Analyzed {} source and {} target fields",
            source_fields.len(),
            target_fields.len()
        );

        Ok(AnalyzeResponse {
            source_fields,
            target_fields,
            mappings,
            success: true,
        })
    }

    pub fn preview(&self, request: PreviewRequest) -> Result<PreviewResponse> {
        let source = present(request.source_json)
            .ok_or_else(|| MapperError::ValidationError("source_json is required".to_string()))?;
        let source = resolve_document(source)?;

        Ok(PreviewResponse {
            transformed: self.transform_data(&source, &request.mappings)?,
            success: true,
        })
    }

    pub fn export(&self, request: ExportRequest) -> ExportResponse {
        ExportResponse {
            config: self.export_config(&request.mappings),
            success: true,
        }
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            status: "healthy",
            app: APP_NAME,
        }
    }
}

/// Parse a document given as a JSON string; other values pass through.
pub fn resolve_document(value: Value) -> Result<Value> {
    match value {
        Value::String(text) => serde_json::from_str(&text)
            .map_err(|e| MapperError::ParseError(format!("Invalid JSON: {}", e))),
        other => Ok(other),
    }
}

// Missing, null and empty inputs all count as absent
fn present(value: Option<Value>) -> Option<Value> {
    value.filter(|v| match v {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::String(s) => !s.is_empty(),
        _ => true,
    })
}

fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| MapperError::ValidationError(format!("{} must be a JSON object", what)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_fields_requires_object() {
        let engine = MappingEngine::default();

        assert_eq!(engine.extract_fields(&json!({"b": 1, "a": 2})).unwrap(), vec!["a", "b"]);
        let err = engine.extract_fields(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, MapperError::ValidationError(_)));
    }

    #[test]
    fn test_analyze_parses_string_documents() {
        let engine = MappingEngine::default();
        let request = AnalyzeRequest {
            source_json: Some(json!(r#"{"customerID": 1}"#)),
            target_json: Some(json!({"customer_id": 0})),
            threshold: None,
        };

        let response = engine.analyze(request).unwrap();
        assert_eq!(response.source_fields, vec!["customerID"]);
        assert_eq!(response.mappings[0].target, "customer_id");
        assert_eq!(response.mappings[0].confidence, 1.0);
    }

    #[test]
    fn test_analyze_validation() {
        let engine = MappingEngine::default();

        let missing = AnalyzeRequest {
            source_json: Some(json!({"a": 1})),
            ..Default::default()
        };
        assert!(matches!(engine.analyze(missing), Err(MapperError::ValidationError(_))));

        let empty = AnalyzeRequest {
            source_json: Some(json!({})),
            target_json: Some(json!({"a": 1})),
            threshold: None,
        };
        assert!(matches!(engine.analyze(empty), Err(MapperError::ValidationError(_))));

        let malformed = AnalyzeRequest {
            source_json: Some(json!("{oops")),
            target_json: Some(json!({"a": 1})),
            threshold: None,
        };
        assert!(matches!(engine.analyze(malformed), Err(MapperError::ParseError(_))));
    }

    #[test]
    fn test_threshold_override() {
        let engine = MappingEngine::new(EngineConfig::default().with_threshold(1.0));
        let source = ["full_name"];
        let target = ["name"];

        assert_eq!(engine.suggest_mappings(&source, &target, None)[0].target, "");
        assert_eq!(engine.suggest_mappings(&source, &target, Some(0.3))[0].target, "name");
    }

    #[test]
    fn test_preview() {
        let engine = MappingEngine::default();
        let request: PreviewRequest = serde_json::from_value(json!({
            "source_json": {"user": {"first": "ada"}},
            "mappings": [{"source": "user.first", "target": "person.name", "transform": "uppercase"}]
        }))
        .unwrap();

        let response = engine.preview(request).unwrap();
        assert_eq!(Value::Object(response.transformed), json!({"person": {"name": "ADA"}}));

        let err = engine.preview(PreviewRequest::default()).unwrap_err();
        assert!(matches!(err, MapperError::ValidationError(_)));
    }

    #[test]
    fn test_export_uses_configured_description() {
        let config = EngineConfig {
            description: "orders feed".to_string(),
            ..Default::default()
        };
        let engine = MappingEngine::new(config);
        let response = engine.export(ExportRequest {
            mappings: vec![Correspondence::new("a", "b"), Correspondence::new("c", "")],
        });

        assert_eq!(response.config.description, "orders feed");
        assert_eq!(response.config.mappings.len(), 1);
    }
}
