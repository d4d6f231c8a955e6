//! Rich text detection
//!
//! A field is long-form narrative text when its label names narrative
//! content, or when one of its leading values carries HTML markup or is very
//! long.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::FieldValue;

/// Label fragments that mark narrative fields
pub const RICH_TEXT_LABEL_PATTERNS: [&str; 15] = [
    "description",
    "rationale",
    "notes",
    "content",
    "details",
    "summary",
    "comment",
    "justification",
    "analysis",
    "resolution",
    "root_cause",
    "impact",
    "mitigation",
    "verification",
    "acceptance_criteria",
];

// <p> <ul> <ol> <li> <strong> <em> <div> <span> and any <br variant
static MARKUP_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(p|ul|ol|li|strong|em|div|span)>|<br").unwrap());

/// Whether a normalized field key names narrative content.
///
/// Underscores on both sides are compared as spaces, so `root_cause`
/// matches a field labeled "Root Cause".
pub fn label_suggests_rich_text(key: &str) -> bool {
    let label = key.to_lowercase().replace('_', " ");
    RICH_TEXT_LABEL_PATTERNS
        .iter()
        .any(|pattern| label.contains(&pattern.replace('_', " ")))
}

/// Whether a string carries one of the recognized markup tags
pub fn contains_markup(value: &str) -> bool {
    MARKUP_REGEX.is_match(value)
}

/// Whether any of the first `scan_limit` values looks like rich text
pub fn values_suggest_rich_text(values: &[FieldValue], scan_limit: usize, min_length: usize) -> bool {
    values
        .iter()
        .take(scan_limit)
        .filter_map(FieldValue::as_text)
        .any(|text| contains_markup(text) || text.chars().count() > min_length)
}
