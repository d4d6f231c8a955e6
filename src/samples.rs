//! Sample record projections
//!
//! A few records per type are projected into compact examples so a template
//! author can see what real values look like.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::inference::{InferenceConfig, InferredField, normalize_field_key, truncate_chars};
use crate::models::RawRecord;

const ELLIPSIS: &str = "...";

/// Shorten text for display, marking the cut with an ellipsis.
///
/// The result never exceeds `max_chars` characters.
pub fn truncate_display(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    format!("{}{}", truncate_chars(text, keep), ELLIPSIS)
}

/// Compact projection of one record: title plus a few custom field values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SampleRecord(BTreeMap<String, String>);

impl SampleRecord {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Builds sample projections for one item type
#[derive(Debug, Clone, Copy)]
pub struct SampleRecordBuilder {
    max_records: usize,
    title_length: usize,
    value_length: usize,
    field_limit: usize,
}

impl SampleRecordBuilder {
    pub fn new(max_records: usize, title_length: usize, value_length: usize, field_limit: usize) -> Self {
        Self {
            max_records,
            title_length,
            value_length,
            field_limit,
        }
    }

    pub fn from_config(config: &InferenceConfig) -> Self {
        Self::new(
            config.max_sample_records,
            config.sample_title_length,
            config.sample_value_length,
            config.sample_field_limit,
        )
    }

    /// Project the first records of a type. Records yielding an empty
    /// projection are left out.
    pub fn build(
        &self,
        records: &[RawRecord],
        fields: &BTreeMap<String, InferredField>,
    ) -> Vec<SampleRecord> {
        records
            .iter()
            .take(self.max_records)
            .map(|record| self.project(record, fields))
            .filter(|sample| !sample.is_empty())
            .collect()
    }

    fn project(&self, record: &RawRecord, fields: &BTreeMap<String, InferredField>) -> SampleRecord {
        let mut sample = BTreeMap::new();

        if let Some(title) = record.title.as_deref().filter(|t| !t.is_empty()) {
            sample.insert("title".to_string(), truncate_display(title, self.title_length));
        }

        let mut included = 0;
        for entry in &record.fields {
            if included >= self.field_limit {
                break;
            }
            let key = normalize_field_key(&entry.label);
            if fields
                .get(&key)
                .is_some_and(|field| field.data_type.is_rich_text())
            {
                continue;
            }
            let Some(value) = entry.present_value() else {
                continue;
            };

            sample.insert(key, truncate_display(&value.canonical(), self.value_length));
            included += 1;
        }

        SampleRecord(sample)
    }
}

impl Default for SampleRecordBuilder {
    fn default() -> Self {
        Self::from_config(&InferenceConfig::default())
    }
}
