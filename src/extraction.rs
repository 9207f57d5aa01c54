//! Field paths and document flattening.
//!
//! Nested JSON documents are flattened into an ordered map from dotted field
//! path to scalar leaf value. Arrays of objects are expanded through their
//! first element, which serves as a structural template and marks the path
//! segment with a trailing `[]`.

use std::fmt;

use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Separator between path segments
pub const PATH_SEPARATOR: &str = ".";

/// Suffix marking a segment derived from an array of objects
pub const ARRAY_MARKER: &str = "[]";

/// Flat view of a document: field path -> leaf value, in document order
pub type FlattenedDocument = IndexMap<String, Value>;

/// Represents a path to a leaf field in a nested document
///
/// # Examples
///
/// - `email` - top-level field
/// - `user.address.city` - nested objects
/// - `orders[].sku` - field of each element of the `orders` array
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldPath {
    /// Parsed path segments
    pub segments: Vec<PathSegment>,
}

/// A segment in a field path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A named field (e.g., "user", "name")
    Field(String),
    /// A field holding an array of objects, rendered with a trailing `[]`
    Repeated(String),
}

impl PathSegment {
    /// Segment key with any array marker removed
    pub fn name(&self) -> &str {
        match self {
            PathSegment::Field(name) | PathSegment::Repeated(name) => name,
        }
    }

    pub fn is_repeated(&self) -> bool {
        matches!(self, PathSegment::Repeated(_))
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => write!(f, "{}", name),
            PathSegment::Repeated(name) => write!(f, "{}{}", name, ARRAY_MARKER),
        }
    }
}

impl FieldPath {
    /// The empty path (document root)
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a field path with a given delimiter
    ///
    /// Every occurrence of the array marker is removed from a segment's name;
    /// a segment that contained one is marked repeated.
    ///
    /// # Example
    ///
    /// ```
    /// use data_whisperer::{FieldPath, PathSegment};
    ///
    /// let path = FieldPath::parse("orders[].sku", ".");
    /// assert_eq!(path.segments[0], PathSegment::Repeated("orders".to_string()));
    /// assert_eq!(path.to_string(), "orders[].sku");
    /// ```
    pub fn parse(path: &str, delimiter: &str) -> Self {
        if path.is_empty() {
            return Self::root();
        }

        let segments = path
            .split(delimiter)
            .map(|s| {
                if s.contains(ARRAY_MARKER) {
                    PathSegment::Repeated(s.replace(ARRAY_MARKER, ""))
                } else {
                    PathSegment::Field(s.to_string())
                }
            })
            .collect();

        Self { segments }
    }

    /// Create a field path from a dotted string (common format)
    pub fn from_dotted(path: &str) -> Self {
        Self::parse(path, PATH_SEPARATOR)
    }

    /// Extend this path with one more segment
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Render with a custom separator
    pub fn render(&self, separator: &str) -> String {
        self.segments
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(PATH_SEPARATOR))
    }
}

/// Trait for flat views that can look up a leaf value by field path
pub trait Extractor {
    /// Value at the given path, `None` if the path is not present
    fn extract(&self, path: &str) -> Option<&Value>;

    /// Value at the given path, `Null` if the path is not present
    fn extract_or_null(&self, path: &str) -> Value {
        self.extract(path).cloned().unwrap_or(Value::Null)
    }
}

impl Extractor for FlattenedDocument {
    fn extract(&self, path: &str) -> Option<&Value> {
        self.get(path)
    }
}

/// Flatten a JSON object into dotted leaf paths.
///
/// Objects are recursed into; a non-empty array whose first element is an
/// object is recursed into through that first element only. Everything
/// else, arrays of scalars included, is a leaf. When two routes render to
/// the same path the later value wins and the first position is kept.
///
/// # Example
///
/// ```
/// use data_whisperer::flatten;
/// use serde_json::json;
///
/// let doc = json!({"user": {"name": "John"}, "tags": ["a", "b"]});
/// let flat = flatten(doc.as_object().unwrap());
///
/// assert_eq!(flat["user.name"], json!("John"));
/// assert_eq!(flat["tags"], json!(["a", "b"]));
/// ```
pub fn flatten(document: &Map<String, Value>) -> FlattenedDocument {
    flatten_with(document, &FieldPath::root(), PATH_SEPARATOR)
}

/// Flatten beneath a path prefix, rendering keys with `separator`.
pub fn flatten_with(
    document: &Map<String, Value>,
    prefix: &FieldPath,
    separator: &str,
) -> FlattenedDocument {
    let mut flat = FlattenedDocument::new();
    flatten_into(document, prefix, separator, &mut flat);
    flat
}

fn flatten_into(
    document: &Map<String, Value>,
    prefix: &FieldPath,
    separator: &str,
    out: &mut FlattenedDocument,
) {
    for (key, value) in document {
        match value {
            Value::Object(nested) => {
                let path = prefix.child(PathSegment::Field(key.clone()));
                flatten_into(nested, &path, separator, out);
            }
            Value::Array(items) if matches!(items.first(), Some(Value::Object(_))) => {
                if let Some(Value::Object(template)) = items.first() {
                    let path = prefix.child(PathSegment::Repeated(key.clone()));
                    flatten_into(template, &path, separator, out);
                }
            }
            leaf => {
                let path = prefix.child(PathSegment::Field(key.clone()));
                out.insert(path.render(separator), leaf.clone());
            }
        }
    }
}

/// Extract all leaf field paths, sorted lexicographically.
pub fn extract_field_paths(document: &Map<String, Value>) -> Vec<String> {
    let mut paths: Vec<String> = flatten(document).into_keys().collect();
    paths.sort();
    paths
}
