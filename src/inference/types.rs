//! Inferred field types

use std::collections::BTreeSet;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::models::{FieldValue, TypeHint};

/// Normalize a field label into its lookup key (spaces become underscores).
///
/// Normalizing an already normalized key returns it unchanged.
pub fn normalize_field_key(label: &str) -> String {
    label.replace(' ', "_")
}

/// Data type assigned to a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataType {
    String,
    Number,
    Datetime,
    Boolean,
    RichText,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Number => "number",
            DataType::Datetime => "datetime",
            DataType::Boolean => "boolean",
            DataType::RichText => "richText",
        }
    }

    pub fn is_rich_text(&self) -> bool {
        matches!(self, DataType::RichText)
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expressions a template uses to dereference a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Access {
    /// Plain-text form, usable anywhere a string is expected
    pub plain: String,
    /// HTML-rendering form, present only for rich text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rich: Option<String>,
}

impl Access {
    /// Access expressions for a field, total over (custom, data type)
    pub fn for_field(key: &str, is_custom: bool, data_type: DataType) -> Self {
        let plain = if is_custom {
            format!("fieldValue.{}", key)
        } else {
            key.to_string()
        };
        let rich = data_type.is_rich_text().then(|| {
            if is_custom {
                format!("~~fieldContent.{}", key)
            } else {
                format!("~~{}", key)
            }
        });

        Self { plain, rich }
    }
}

/// Value domain summary of a field
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValueDomain {
    /// Every distinct value, sorted ascending
    Enumerated(Vec<String>),
    /// A few values in first-seen order
    Examples(Vec<String>),
    /// No values materialized (rich text)
    #[default]
    Empty,
}

impl ValueDomain {
    pub fn enumerated(&self) -> &[String] {
        match self {
            ValueDomain::Enumerated(values) => values,
            _ => &[],
        }
    }

    pub fn examples(&self) -> &[String] {
        match self {
            ValueDomain::Examples(values) => values,
            _ => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ValueDomain::Enumerated(values) | ValueDomain::Examples(values) => values.is_empty(),
            ValueDomain::Empty => true,
        }
    }
}

/// Accumulated observations of one field across the records of a type
#[derive(Debug, Clone, PartialEq)]
pub struct FieldObservation {
    /// Normalized field key
    pub key: String,
    /// Display label, as last seen
    pub label: String,
    /// Sourced from the dynamic field list rather than a fixed attribute
    pub is_custom: bool,
    /// Present values, in observation order
    pub values: Vec<FieldValue>,
    /// Declared type hints seen alongside present values
    pub hints: BTreeSet<TypeHint>,
}

impl FieldObservation {
    pub fn new(key: impl Into<String>, label: impl Into<String>, is_custom: bool) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            is_custom,
            values: Vec::new(),
            hints: BTreeSet::new(),
        }
    }

    /// Record one present value
    pub fn observe(
        &mut self,
        value: FieldValue,
        hint: Option<TypeHint>,
        is_custom: bool,
        label: &str,
    ) {
        self.values.push(value);
        if let Some(hint) = hint {
            self.hints.insert(hint);
        }
        self.is_custom = is_custom;
        if self.label != label {
            self.label = label.to_string();
        }
    }

    pub fn has_hint(&self, hint: TypeHint) -> bool {
        self.hints.contains(&hint)
    }
}

/// A fully classified field
#[derive(Debug, Clone, PartialEq)]
pub struct InferredField {
    /// Normalized key
    pub name: String,
    pub label: String,
    pub data_type: DataType,
    pub is_custom_field: bool,
    pub access: Access,
    pub domain: ValueDomain,
    /// Percentage of records carrying the field; `None` when every record does
    pub fill_rate: Option<f64>,
}

impl InferredField {
    /// Fill rate rendered as an integer percent string, e.g. `"67%"`
    pub fn fill_rate_label(&self) -> Option<String> {
        self.fill_rate.map(|rate| format!("{:.0}%", rate))
    }
}

impl Serialize for InferredField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("label", &self.label)?;
        map.serialize_entry("dataType", &self.data_type)?;
        map.serialize_entry("access", &self.access)?;
        if self.is_custom_field {
            map.serialize_entry("isCustomField", &true)?;
        }
        match &self.domain {
            ValueDomain::Enumerated(values) if !values.is_empty() => {
                map.serialize_entry("uniqueValues", values)?;
            }
            ValueDomain::Examples(values) if !values.is_empty() => {
                map.serialize_entry("exampleValues", values)?;
            }
            _ => {}
        }
        if let Some(label) = self.fill_rate_label() {
            map.serialize_entry("fillRate", &label)?;
        }
        map.end()
    }
}
