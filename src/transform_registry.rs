//! Value transforms applied while reshaping.
//!
//! Transforms are an enumerated set dispatched by name. Dispatch is fail-soft:
//! an unknown name, or a value a transform cannot handle, passes the original
//! value through unchanged.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Number, Value};

static SIGNED_INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?\d+").expect("valid regex"));

/// Error type for transform lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    NotFound(String),
    ExecutionError(String),
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::NotFound(name) => write!(f, "Transform not found: {}", name),
            TransformError::ExecutionError(msg) => write!(f, "Execution error: {}", msg),
        }
    }
}

impl std::error::Error for TransformError {}

/// The enumerated value transforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformKind {
    Lowercase,
    Uppercase,
    Trim,
    ToString,
    ToInt,
}

impl TransformKind {
    pub const ALL: [TransformKind; 5] = [
        TransformKind::Lowercase,
        TransformKind::Uppercase,
        TransformKind::Trim,
        TransformKind::ToString,
        TransformKind::ToInt,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TransformKind::Lowercase => "lowercase",
            TransformKind::Uppercase => "uppercase",
            TransformKind::Trim => "trim",
            TransformKind::ToString => "to_string",
            TransformKind::ToInt => "to_int",
        }
    }

    /// Apply to a non-null value
    fn execute(&self, value: &Value) -> Result<Value, TransformError> {
        match self {
            TransformKind::Lowercase => Ok(Value::String(stringify(value).to_lowercase())),
            TransformKind::Uppercase => Ok(Value::String(stringify(value).to_uppercase())),
            TransformKind::Trim => Ok(Value::String(stringify(value).trim().to_string())),
            TransformKind::ToString => Ok(Value::String(stringify(value))),
            TransformKind::ToInt => to_int(value),
        }
    }
}

impl FromStr for TransformKind {
    type Err = TransformError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        TransformKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| TransformError::NotFound(name.to_string()))
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// String form of a value: strings as-is, booleans as `True`/`False`,
/// everything else as compact JSON
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        other => other.to_string(),
    }
}

fn to_int(value: &Value) -> Result<Value, TransformError> {
    match value {
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                return Ok(value.clone());
            }
            let f = n
                .as_f64()
                .ok_or_else(|| TransformError::ExecutionError(format!("not a number: {}", n)))?;
            let truncated = f.trunc();
            if truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
                Ok(Value::Number(Number::from(truncated as i64)))
            } else if truncated >= 0.0 && truncated < u64::MAX as f64 {
                Ok(Value::Number(Number::from(truncated as u64)))
            } else {
                Err(TransformError::ExecutionError(format!("{} is out of range", f)))
            }
        }
        Value::Bool(b) => Ok(Value::Number(Number::from(i64::from(*b)))),
        other => {
            let text = stringify(other);
            match SIGNED_INTEGER.find(&text) {
                Some(m) => {
                    let digits = m.as_str();
                    digits
                        .parse::<i64>()
                        .map(Number::from)
                        .or_else(|_| digits.parse::<u64>().map(Number::from))
                        .map(Value::Number)
                        .map_err(|e| TransformError::ExecutionError(format!("{}: {}", digits, e)))
                }
                None => Ok(Value::Number(Number::from(0))),
            }
        }
    }
}

/// Dispatches transform names to their implementations
#[derive(Debug, Clone)]
pub struct TransformRegistry {
    transforms: Vec<TransformKind>,
}

impl TransformRegistry {
    /// Create a registry holding every built-in transform
    pub fn new() -> Self {
        Self {
            transforms: TransformKind::ALL.to_vec(),
        }
    }

    /// Look up a transform by name
    pub fn lookup(&self, name: &str) -> Result<TransformKind, TransformError> {
        let kind = name.parse::<TransformKind>()?;
        if self.transforms.contains(&kind) {
            Ok(kind)
        } else {
            Err(TransformError::NotFound(name.to_string()))
        }
    }

    /// Call a transform, surfacing lookup and conversion failures
    pub fn call(&self, name: &str, value: &Value) -> Result<Value, TransformError> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        self.lookup(name)?.execute(value)
    }

    /// Apply a transform, falling back to the original value on any failure
    ///
    /// # Example
    ///
    /// ```
    /// use data_whisperer::TransformRegistry;
    /// use serde_json::json;
    ///
    /// let registry = TransformRegistry::new();
    /// assert_eq!(registry.apply(&json!("abc123"), "to_int"), json!(123));
    /// assert_eq!(registry.apply(&json!("Hi"), "reverse"), json!("Hi"));
    /// ```
    pub fn apply(&self, value: &Value, name: &str) -> Value {
        match self.call(name, value) {
            Ok(transformed) => transformed,
            Err(e) => {
                tracing::debug!(transform = name, error = %e, "transform not applied");
                value.clone()
            }
        }
    }

    /// Check if a transform is registered
    pub fn has_transform(&self, name: &str) -> bool {
        self.lookup(name).is_ok()
    }

    /// Get list of all registered transform names
    pub fn list_transforms(&self) -> Vec<String> {
        self.transforms.iter().map(|kind| kind.name().to_string()).collect()
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply a named transform with the built-in registry.
pub fn apply_transform(value: &Value, name: &str) -> Value {
    TransformRegistry::new().apply(value, name)
}
