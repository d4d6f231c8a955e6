//! Raw item records as delivered by a record source
//!
//! Records arrive as loosely shaped JSON. [`RawRecord::from_json`] converts
//! them into typed values, skipping malformed field and relation entries one
//! at a time instead of rejecting the whole record.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Declared type hint attached to a field entry
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TypeHint {
    #[default]
    String,
    Number,
    Date,
    Datetime,
    Boolean,
    /// Any hint outside the documented set
    #[serde(other)]
    Other,
}

impl TypeHint {
    /// Parse a hint string, falling back to [`TypeHint::Other`]
    pub fn parse(hint: &str) -> Self {
        match hint {
            "string" => TypeHint::String,
            "number" => TypeHint::Number,
            "date" => TypeHint::Date,
            "datetime" => TypeHint::Datetime,
            "boolean" => TypeHint::Boolean,
            _ => TypeHint::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeHint::String => "string",
            TypeHint::Number => "number",
            TypeHint::Date => "date",
            TypeHint::Datetime => "datetime",
            TypeHint::Boolean => "boolean",
            TypeHint::Other => "other",
        }
    }

    /// Whether the hint declares a temporal value
    pub fn is_temporal(&self) -> bool {
        matches!(self, TypeHint::Date | TypeHint::Datetime)
    }
}

/// A single observed value, tagged by its shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum FieldValue {
    Text(String),
    Number(Number),
    Boolean(bool),
    DateTime(String),
    /// Arrays, objects and anything else without a dedicated variant
    Unknown(Value),
}

impl FieldValue {
    /// Convert a JSON value, using the declared hint to tag temporal strings.
    ///
    /// Returns `None` for JSON `null`.
    pub fn from_json(value: &Value, hint: TypeHint) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) if hint.is_temporal() => Some(FieldValue::DateTime(s.clone())),
            Value::String(s) => Some(FieldValue::Text(s.clone())),
            Value::Number(n) => Some(FieldValue::Number(n.clone())),
            Value::Bool(b) => Some(FieldValue::Boolean(*b)),
            other => Some(FieldValue::Unknown(other.clone())),
        }
    }

    /// Presence predicate, decided per variant.
    ///
    /// Text is present when non-empty; `0` and `false` always count.
    pub fn is_present(&self) -> bool {
        match self {
            FieldValue::Text(s) | FieldValue::DateTime(s) => !s.is_empty(),
            FieldValue::Number(_) | FieldValue::Boolean(_) => true,
            FieldValue::Unknown(v) => !v.is_null(),
        }
    }

    /// String content for text-like variants
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) | FieldValue::DateTime(s) => Some(s),
            _ => None,
        }
    }

    /// Canonical string form used for value domains, statuses and samples
    pub fn canonical(&self) -> String {
        match self {
            FieldValue::Text(s) | FieldValue::DateTime(s) => s.clone(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Boolean(b) => b.to_string(),
            FieldValue::Unknown(v) => v.to_string(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(Number::from(value))
    }
}

/// One entry of a record's dynamic field list
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEntry {
    pub label: String,
    pub value: Option<FieldValue>,
    pub type_hint: TypeHint,
}

impl FieldEntry {
    pub fn new(label: impl Into<String>, value: Option<FieldValue>, type_hint: TypeHint) -> Self {
        Self {
            label: label.into(),
            value,
            type_hint,
        }
    }

    /// The value, if it passes the presence predicate
    pub fn present_value(&self) -> Option<&FieldValue> {
        self.value.as_ref().filter(|v| v.is_present())
    }

    fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let label = obj.get("label")?.as_str()?;
        if label.is_empty() {
            return None;
        }
        let type_hint = obj
            .get("type")
            .and_then(Value::as_str)
            .map(TypeHint::parse)
            .unwrap_or_default();
        let value = obj
            .get("value")
            .and_then(|v| FieldValue::from_json(v, type_hint));

        Some(Self::new(label, value, type_hint))
    }
}

/// Relation name used when an entry carries none
pub const UNKNOWN_RELATION: &str = "UNKNOWN";

/// A named, directed edge from the owning record to another record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationEntry {
    pub relation_type: String,
    /// Identifier of the target record, when the source provides one
    pub target: Option<String>,
}

impl RelationEntry {
    pub fn new(relation_type: impl Into<String>, target: Option<String>) -> Self {
        Self {
            relation_type: relation_type.into(),
            target,
        }
    }

    fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let relation_type = obj
            .get("type")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_RELATION);
        let target = match obj.get("toItem") {
            Some(Value::Object(item)) => item.get("id").and_then(Value::as_str).map(String::from),
            Some(Value::String(id)) => Some(id.clone()),
            _ => None,
        };

        Some(Self::new(relation_type, target))
    }
}

/// Names of the fixed record attributes, in observation order
pub const STANDARD_ATTRIBUTES: [&str; 4] = ["title", "revision", "isControlled", "createdAt"];

/// A single item record
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRecord {
    pub type_name: String,
    pub title: Option<String>,
    pub created_at: Option<String>,
    pub revision: Option<FieldValue>,
    pub is_controlled: Option<bool>,
    pub fields: Vec<FieldEntry>,
    pub relations: Vec<RelationEntry>,
}

impl RawRecord {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_field(
        mut self,
        label: impl Into<String>,
        value: impl Into<FieldValue>,
        type_hint: TypeHint,
    ) -> Self {
        self.fields
            .push(FieldEntry::new(label, Some(value.into()), type_hint));
        self
    }

    pub fn with_relation(mut self, relation_type: impl Into<String>, target: Option<&str>) -> Self {
        self.relations
            .push(RelationEntry::new(relation_type, target.map(String::from)));
        self
    }

    /// Parse a record from source JSON.
    ///
    /// Returns `None` only when the root is not an object. Field entries that
    /// are not objects or carry no label, and relation entries that are not
    /// objects, are dropped individually.
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let type_name = obj
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let title = obj.get("title").and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        });
        let created_at = obj
            .get("createdAt")
            .and_then(Value::as_str)
            .map(String::from);
        let revision = obj
            .get("revision")
            .and_then(|v| FieldValue::from_json(v, TypeHint::Number));
        let is_controlled = obj.get("isControlled").and_then(Value::as_bool);

        let fields = obj
            .get("fields")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(FieldEntry::from_json).collect())
            .unwrap_or_default();
        let relations = obj
            .get("relations")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(RelationEntry::from_json).collect())
            .unwrap_or_default();

        Some(Self {
            type_name,
            title,
            created_at,
            revision,
            is_controlled,
            fields,
            relations,
        })
    }

    /// Present fixed attributes, keyed by their attribute name
    pub fn standard_values(&self) -> Vec<(&'static str, FieldValue)> {
        let candidates = [
            self.title.as_deref().map(FieldValue::from),
            self.revision.clone(),
            self.is_controlled.map(FieldValue::Boolean),
            self.created_at.clone().map(FieldValue::DateTime),
        ];

        STANDARD_ATTRIBUTES
            .into_iter()
            .zip(candidates)
            .filter_map(|(name, value)| value.filter(|v| v.is_present()).map(|v| (name, v)))
            .collect()
    }

    /// First present value of the field entry with exactly this label
    pub fn field_value(&self, label: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .filter(|entry| entry.label == label)
            .find_map(FieldEntry::present_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_presence_keeps_zero_and_false() {
        assert!(FieldValue::Boolean(false).is_present());
        assert!(FieldValue::from(0i64).is_present());
        assert!(!FieldValue::Text(String::new()).is_present());
        assert!(FieldValue::from_json(&Value::Null, TypeHint::String).is_none());
    }

    #[test]
    fn test_temporal_hint_tags_datetime() {
        let value = FieldValue::from_json(&json!("2024-01-15"), TypeHint::Date).unwrap();
        assert_eq!(value, FieldValue::DateTime("2024-01-15".to_string()));

        let value = FieldValue::from_json(&json!("2024-01-15"), TypeHint::String).unwrap();
        assert_eq!(value, FieldValue::Text("2024-01-15".to_string()));
    }

    #[test]
    fn test_canonical_strings() {
        assert_eq!(FieldValue::from(42i64).canonical(), "42");
        assert_eq!(FieldValue::Boolean(true).canonical(), "true");
        assert_eq!(
            FieldValue::Unknown(json!(["a", "b"])).canonical(),
            r#"["a","b"]"#
        );
    }

    #[test]
    fn test_unknown_hint_parses_as_other() {
        assert_eq!(TypeHint::parse("user"), TypeHint::Other);
        let hint: TypeHint = serde_json::from_str(r#""richtext""#).unwrap();
        assert_eq!(hint, TypeHint::Other);
    }

    #[test]
    fn test_from_json_skips_malformed_entries() {
        let record = RawRecord::from_json(&json!({
            "type": "Requirement",
            "title": "Login works",
            "revision": 3,
            "isControlled": false,
            "createdAt": "2024-01-01T00:00:00Z",
            "fields": [
                {"label": "Status", "value": "Open", "type": "string"},
                "not an object",
                {"value": "no label"},
                {"label": "", "value": "empty label"},
                {"label": "Priority", "value": 2, "type": "number"}
            ],
            "relations": [
                {"type": "TESTS", "toItem": {"id": "KXITM1"}},
                42,
                {"toItem": "KXITM2"}
            ]
        }))
        .unwrap();

        assert_eq!(record.type_name, "Requirement");
        assert_eq!(record.fields.len(), 2);
        assert_eq!(record.fields[1].type_hint, TypeHint::Number);
        assert_eq!(record.relations.len(), 2);
        assert_eq!(record.relations[0].target.as_deref(), Some("KXITM1"));
        assert_eq!(record.relations[1].relation_type, UNKNOWN_RELATION);
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert!(RawRecord::from_json(&json!(["Requirement"])).is_none());
    }

    #[test]
    fn test_standard_values_skip_empty() {
        let mut record = RawRecord::new("Risk").with_title("");
        record.is_controlled = Some(false);
        record.created_at = Some("2024-02-01".to_string());

        let names: Vec<_> = record.standard_values().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["isControlled", "createdAt"]);
    }

    #[test]
    fn test_field_value_lookup() {
        let record = RawRecord::new("Requirement")
            .with_field("ID", "REQ-1", TypeHint::String)
            .with_field("Status", "", TypeHint::String);

        assert_eq!(record.field_value("ID"), Some(&FieldValue::from("REQ-1")));
        assert!(record.field_value("Status").is_none());
    }
}
