//! Value domain sampling
//!
//! Decides between an enumerated categorical domain and a short list of
//! example values.

use std::collections::HashSet;

use super::config::InferenceConfig;
use super::types::{DataType, ValueDomain};
use crate::models::FieldValue;

/// Truncate a string to at most `max_chars` characters
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Summarizes raw observed values into a [`ValueDomain`]
#[derive(Debug, Clone, Copy)]
pub struct ValueSampler {
    max_unique_values: usize,
    max_example_values: usize,
    max_value_length: usize,
}

impl ValueSampler {
    pub fn new(max_unique_values: usize, max_example_values: usize, max_value_length: usize) -> Self {
        Self {
            max_unique_values,
            max_example_values,
            max_value_length,
        }
    }

    pub fn from_config(config: &InferenceConfig) -> Self {
        Self::new(
            config.max_unique_values,
            config.max_example_values,
            config.max_value_length,
        )
    }

    /// Canonical, truncated string form of a value
    pub fn canonicalize(&self, value: &FieldValue) -> String {
        match value.as_text() {
            Some(text) => truncate_chars(text, self.max_value_length).to_string(),
            None => value.canonical(),
        }
    }

    /// Build the domain for a field's values.
    ///
    /// Rich text never materializes samples.
    pub fn sample(&self, values: &[FieldValue], data_type: DataType) -> ValueDomain {
        if data_type.is_rich_text() || values.is_empty() {
            return ValueDomain::Empty;
        }

        let mut seen = HashSet::new();
        let mut distinct = Vec::new();
        for value in values {
            let canonical = self.canonicalize(value);
            if seen.insert(canonical.clone()) {
                distinct.push(canonical);
            }
        }

        if distinct.len() <= self.max_unique_values {
            distinct.sort();
            ValueDomain::Enumerated(distinct)
        } else {
            distinct.truncate(self.max_example_values);
            ValueDomain::Examples(distinct)
        }
    }
}

impl Default for ValueSampler {
    fn default() -> Self {
        Self::from_config(&InferenceConfig::default())
    }
}
