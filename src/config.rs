//! Engine settings and mapping configuration documents.
//!
//! `EngineConfig` carries tunables read from the environment. `MappingConfig`
//! is the exportable shape of an accepted mapping list; it can also be read
//! back from a JSON or YAML file to drive a transform.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assignment::{null_as_empty, Correspondence, DEFAULT_THRESHOLD};
use crate::error::{MapperError, Result};

/// Version stamped into exported configurations
pub const CONFIG_VERSION: &str = "1.0";

pub const DEFAULT_DESCRIPTION: &str = "Data Whisperer mapping configuration";

/// Engine tunables
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Minimum confidence for a suggestion
    pub threshold: f64,
    /// Description written into exported configurations
    pub description: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            description: DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

impl EngineConfig {
    /// Read `WHISPERER_THRESHOLD` and `WHISPERER_DESCRIPTION`, falling back
    /// to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("WHISPERER_THRESHOLD") {
            match raw.trim().parse::<f64>() {
                Ok(threshold) if threshold.is_finite() => config.threshold = threshold,
                _ => tracing::warn!(
                    "Ignoring invalid WHISPERER_THRESHOLD {:?}, using {}",
                    raw,
                    config.threshold
                ),
            }
        }

        if let Ok(description) = std::env::var("WHISPERER_DESCRIPTION") {
            if !description.is_empty() {
                config.description = description;
            }
        }

        config
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }
}

/// One accepted mapping in an exported configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingEntry {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub source: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub target: String,
    #[serde(default)]
    pub transform: Option<String>,
}

impl From<MappingEntry> for Correspondence {
    fn from(entry: MappingEntry) -> Self {
        Correspondence {
            source: entry.source,
            target: entry.target,
            confidence: 0.0,
            transform: entry.transform,
        }
    }
}

/// Exportable mapping configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingConfig {
    pub version: String,
    pub description: String,
    pub mappings: Vec<MappingEntry>,
}

impl MappingConfig {
    /// Keep only mappings with both a source and a target.
    pub fn from_mappings(description: impl Into<String>, mappings: &[Correspondence]) -> Self {
        let mappings = mappings
            .iter()
            .filter(|m| m.is_complete())
            .map(|m| MappingEntry {
                source: m.source.clone(),
                target: m.target.clone(),
                transform: m.transform.clone(),
            })
            .collect();

        Self {
            version: CONFIG_VERSION.to_string(),
            description: description.into(),
            mappings,
        }
    }

    pub fn to_correspondences(&self) -> Vec<Correspondence> {
        self.mappings.iter().cloned().map(Correspondence::from).collect()
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Either a bare mapping list or a full exported configuration
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MappingFile {
    List(Vec<Correspondence>),
    Config(MappingConfig),
}

/// Parse mappings from JSON or YAML text.
pub fn parse_mappings(contents: &str, yaml: bool) -> Result<Vec<Correspondence>> {
    let parsed: MappingFile = if yaml {
        serde_yaml::from_str(contents)?
    } else {
        serde_json::from_str(contents)
            .map_err(|e| MapperError::ParseError(format!("Invalid JSON: {}", e)))?
    };

    Ok(match parsed {
        MappingFile::List(list) => list,
        MappingFile::Config(config) => config.to_correspondences(),
    })
}

/// Load mappings from a file; `.yaml`/`.yml` files are read as YAML,
/// anything else as JSON.
pub fn load_mappings<P: AsRef<Path>>(path: P) -> Result<Vec<Correspondence>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );

    let mappings = parse_mappings(&contents, yaml)?;
    tracing::debug!("Loaded {} mappings from {}", mappings.len(), path.display());
    Ok(mappings)
}
