//! # Data Whisperer: Field Mapping Between JSON Documents
//!
//! Suggests which fields of a source JSON document correspond to which
//! fields of a differently-shaped target document, then reshapes source
//! data into the target structure using an accepted set of mappings.
//!
//! ## Features
//!
//! - **Flattening**: nested objects and arrays of objects become dotted field paths (`orders[].sku`)
//! - **Similarity scoring**: name normalization, matching-block ratio, substring and synonym boosts
//! - **Greedy assignment**: one-to-one suggestions ranked by confidence
//! - **Reshaping**: rebuild nested target documents, with per-field value transforms
//!
//! ## Example
//!
//! ```
//! use data_whisperer::{Correspondence, MappingEngine};
//! use serde_json::json;
//!
//! let engine = MappingEngine::default();
//!
//! let source = json!({"customer": {"customerID": 7, "fullName": " Ada "}});
//! let target = json!({"user": {"id": 0, "name": ""}});
//!
//! let source_fields = engine.extract_fields(&source).unwrap();
//! let target_fields = engine.extract_fields(&target).unwrap();
//! let suggestions = engine.suggest_mappings(&source_fields, &target_fields, None);
//! assert_eq!(suggestions.len(), 2);
//!
//! let mappings = vec![
//!     Correspondence::new("customer.customerID", "user.id"),
//!     Correspondence::new("customer.fullName", "user.name").with_transform("trim"),
//! ];
//! let reshaped = engine.transform_data(&source, &mappings).unwrap();
//! assert_eq!(serde_json::Value::Object(reshaped), json!({"user": {"id": 7, "name": "Ada"}}));
//! ```

// Core modules
pub mod normalize;
pub mod similarity;
pub mod extraction;
pub mod assignment;
pub mod transform_registry;
pub mod reshape;

// Facade, configuration and I/O
pub mod config;
pub mod engine;
pub mod error;
pub mod serialization;

// Re-export key types
pub use normalize::normalize_field_name;
pub use similarity::{calculate_similarity, SequenceMatcher, SimilarityScorer, SynonymTable};
pub use extraction::{
    extract_field_paths, flatten, flatten_with, Extractor, FieldPath, FlattenedDocument, PathSegment,
};
pub use assignment::{suggest_mappings, Correspondence, MappingAssigner, DEFAULT_THRESHOLD};
pub use transform_registry::{apply_transform, TransformError, TransformKind, TransformRegistry};
pub use reshape::reshape;
pub use config::{load_mappings, EngineConfig, MappingConfig, MappingEntry};
pub use engine::{
    AnalyzeRequest, AnalyzeResponse, ExportRequest, ExportResponse, MappingEngine, PreviewRequest,
    PreviewResponse,
};
pub use error::{MapperError, Result};
pub use serialization::NdjsonWriter;
