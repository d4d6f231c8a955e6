//! Field inference engine

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use super::config::InferenceConfig;
use super::error::InferenceError;
use super::richtext::{label_suggests_rich_text, values_suggest_rich_text};
use super::sampler::ValueSampler;
use super::types::{Access, DataType, FieldObservation, InferredField, normalize_field_key};
use crate::models::{RawRecord, TypeHint};

/// Label of the field entry carrying a record's workflow status
pub const STATUS_LABEL: &str = "Status";

/// Result of inferring one item type
#[derive(Debug, Clone, PartialEq)]
pub struct TypeInference {
    /// Records folded into the inference
    pub record_count: usize,
    /// Classified fields keyed by normalized name
    pub fields: BTreeMap<String, InferredField>,
    /// Distinct status values, sorted ascending
    pub statuses: Vec<String>,
}

/// Field inference engine
///
/// Folds the records of one item type into per-field observations and
/// classifies each field once all records have been seen.
#[derive(Debug)]
pub struct FieldInferrer<'a> {
    config: &'a InferenceConfig,
    observations: BTreeMap<String, FieldObservation>,
    statuses: BTreeSet<String>,
    record_count: usize,
}

impl<'a> FieldInferrer<'a> {
    pub fn new(config: &'a InferenceConfig) -> Self {
        Self {
            config,
            observations: BTreeMap::new(),
            statuses: BTreeSet::new(),
            record_count: 0,
        }
    }

    /// Add a record in source JSON form
    pub fn add_value(&mut self, value: &Value) -> Result<(), InferenceError> {
        let record = RawRecord::from_json(value)
            .ok_or_else(|| InferenceError::InvalidStructure(value_type_name(value).to_string()))?;
        self.add_record(&record);
        Ok(())
    }

    /// Add a parsed record
    pub fn add_record(&mut self, record: &RawRecord) {
        self.record_count += 1;

        for (name, value) in record.standard_values() {
            self.observations
                .entry(name.to_string())
                .or_insert_with(|| FieldObservation::new(name, name, false))
                .observe(value, None, false, name);
        }

        for entry in &record.fields {
            let Some(value) = entry.present_value() else {
                continue;
            };
            let key = normalize_field_key(&entry.label);

            if entry.label == STATUS_LABEL {
                self.statuses.insert(value.canonical());
            }

            self.observations
                .entry(key.clone())
                .or_insert_with(|| FieldObservation::new(key, entry.label.as_str(), true))
                .observe(value.clone(), Some(entry.type_hint), true, &entry.label);
        }
    }

    /// Add a batch of parsed records
    pub fn add_records<'r>(&mut self, records: impl IntoIterator<Item = &'r RawRecord>) {
        for record in records {
            self.add_record(record);
        }
    }

    /// Get the number of records processed
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// Current observation for a field key
    pub fn observation(&self, key: &str) -> Option<&FieldObservation> {
        self.observations.get(key)
    }

    /// Classify every observed field
    pub fn finalize(self) -> Result<TypeInference, InferenceError> {
        if self.record_count == 0 {
            return Err(InferenceError::NoRecords);
        }

        let sampler = ValueSampler::from_config(self.config);
        let fields = self
            .observations
            .values()
            .map(|obs| {
                let field = classify_field(obs, self.record_count, self.config, &sampler);
                (obs.key.clone(), field)
            })
            .collect();

        Ok(TypeInference {
            record_count: self.record_count,
            fields,
            statuses: self.statuses.into_iter().collect(),
        })
    }
}

/// Resolve a field's data type. First match wins:
/// rich text, number, datetime, boolean, then string.
pub fn resolve_data_type(observation: &FieldObservation, config: &InferenceConfig) -> DataType {
    if label_suggests_rich_text(&observation.key)
        || values_suggest_rich_text(
            &observation.values,
            config.rich_text_scan_limit,
            config.rich_text_min_length,
        )
    {
        DataType::RichText
    } else if observation.has_hint(TypeHint::Number) {
        DataType::Number
    } else if observation.has_hint(TypeHint::Date) || observation.has_hint(TypeHint::Datetime) {
        DataType::Datetime
    } else if observation.has_hint(TypeHint::Boolean) {
        DataType::Boolean
    } else {
        DataType::String
    }
}

/// Classify one accumulated field observation
pub fn classify_field(
    observation: &FieldObservation,
    record_count: usize,
    config: &InferenceConfig,
    sampler: &ValueSampler,
) -> InferredField {
    let data_type = resolve_data_type(observation, config);
    let access = Access::for_field(&observation.key, observation.is_custom, data_type);
    let domain = sampler.sample(&observation.values, data_type);

    let fill_rate = if record_count == 0 {
        Some(0.0)
    } else {
        let rate = observation.values.len() as f64 / record_count as f64 * 100.0;
        (rate < 100.0).then_some(rate)
    };

    InferredField {
        name: observation.key.clone(),
        label: observation.label.clone(),
        data_type,
        is_custom_field: observation.is_custom,
        access,
        domain,
        fill_rate,
    }
}

/// Infer fields and statuses for a set of records of one type
pub fn infer_type(
    records: &[RawRecord],
    config: &InferenceConfig,
) -> Result<TypeInference, InferenceError> {
    let mut inferrer = FieldInferrer::new(config);
    inferrer.add_records(records);
    inferrer.finalize()
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
