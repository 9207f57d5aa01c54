//! Error types for the mapping engine.
//!
//! Only structurally invalid inputs are errors. Scoring, transforms and
//! reshaping are fail-soft and never produce a `MapperError`.

use std::fmt;

/// Error type for engine operations
#[derive(Debug)]
pub enum MapperError {
    /// Input could not be parsed as JSON or YAML
    ParseError(String),
    /// A required input was missing or had the wrong shape
    ValidationError(String),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
}

impl MapperError {
    /// True for errors caused by the caller's input rather than the engine.
    pub fn is_client_error(&self) -> bool {
        matches!(self, MapperError::ParseError(_) | MapperError::ValidationError(_))
    }
}

impl From<serde_json::Error> for MapperError {
    fn from(err: serde_json::Error) -> Self {
        MapperError::JsonError(err)
    }
}

impl From<serde_yaml::Error> for MapperError {
    fn from(err: serde_yaml::Error) -> Self {
        MapperError::ParseError(format!("Invalid YAML: {}", err))
    }
}

impl From<std::io::Error> for MapperError {
    fn from(err: std::io::Error) -> Self {
        MapperError::IoError(err)
    }
}

impl fmt::Display for MapperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapperError::ParseError(msg) => write!(f, "{}", msg),
            MapperError::ValidationError(msg) => write!(f, "{}", msg),
            MapperError::IoError(e) => write!(f, "IO error: {}", e),
            MapperError::JsonError(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for MapperError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapperError::IoError(e) => Some(e),
            MapperError::JsonError(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, MapperError>;
