//! Field name canonicalization.
//!
//! Names like `customerID`, `customer-id` and `Customer ID` all normalize to
//! `customer_id` so that the similarity heuristics compare like with like.

use once_cell::sync::Lazy;
use regex::Regex;

// "xWord" -> "x_Word"
static WORD_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("valid regex"));

// "aB" / "1B" -> "a_B" / "1_B"
static CASE_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid regex"));

static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-.\s]+").expect("valid regex"));

static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9_]").expect("valid regex"));

/// Normalize a field name for comparison.
///
/// Splits camel case into snake case, lowercases, collapses hyphens, dots
/// and whitespace into a single underscore, then drops anything that is not
/// `[a-z0-9_]`. The result is idempotent.
///
/// # Example
///
/// ```
/// use data_whisperer::normalize_field_name;
///
/// assert_eq!(normalize_field_name("customerID"), "customer_id");
/// assert_eq!(normalize_field_name("full-name"), "full_name");
/// ```
pub fn normalize_field_name(field: &str) -> String {
    let field = WORD_BOUNDARY.replace_all(field, "${1}_${2}");
    let field = CASE_BOUNDARY.replace_all(&field, "${1}_${2}");
    let field = field.to_lowercase();
    let field = SEPARATORS.replace_all(&field, "_");
    DISALLOWED.replace_all(&field, "").into_owned()
}
