//! Schema document types

use std::collections::BTreeMap;

use serde::Serialize;
use serde::ser::Serializer;

use super::builtins::BuiltinCatalog;
use crate::inference::InferredField;
use crate::models::VersionInfo;
use crate::relations::{OutgoingRelation, RelationEdge};
use crate::samples::SampleRecord;

/// Format version of the generated document
pub const DOCUMENT_VERSION: &str = "2.0.0";

/// Purpose statement stamped into every document
pub const DOCUMENT_PURPOSE: &str = "AI-optimized project data for template generation";

/// Usage notes for consumers of the document
pub const USAGE_NOTES: [&str; 5] = [
    "access.plain: Use in table cells, inline text, anywhere plain string is needed",
    "access.rich: Use when HTML rendering is desired (prefixed with ~~)",
    "kqlQuery: Pre-computed query to fetch all items of this type",
    "uniqueValues: All possible values (for categorical fields with <=25 values)",
    "exampleValues: Sample values (for fields with >25 unique values)",
];

/// Generation metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMeta {
    pub generated_at: String,
    pub purpose: String,
    pub version: String,
    pub notes: Vec<String>,
}

/// Project summary section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// The version the document was generated for; all members are null when
/// the project has no versions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSummary {
    pub id: Option<String>,
    pub name: Option<String>,
    pub is_released: Option<bool>,
}

impl From<Option<&VersionInfo>> for VersionSummary {
    fn from(version: Option<&VersionInfo>) -> Self {
        match version {
            Some(v) => Self {
                id: Some(v.id.clone()),
                name: Some(v.name.clone()),
                is_released: Some(v.is_released),
            },
            None => Self::default(),
        }
    }
}

/// Entry of the all-versions list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionEntry {
    pub id: String,
    pub name: String,
    pub is_released: bool,
}

impl From<&VersionInfo> for VersionEntry {
    fn from(v: &VersionInfo) -> Self {
        Self {
            id: v.id.clone(),
            name: v.name.clone(),
            is_released: v.is_released,
        }
    }
}

/// Summary totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSummary {
    pub total_items: usize,
    pub item_type_count: usize,
    pub total_relations: usize,
}

/// Schema of one item type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemTypeSchema {
    #[serde(skip)]
    pub name: String,
    /// Query expression fetching every record of this type
    #[serde(rename = "kqlQuery")]
    pub query: String,
    pub count: usize,
    pub fields: BTreeMap<String, InferredField>,
    pub sample_records: Vec<SampleRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub statuses: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub outgoing_relations: Vec<OutgoingRelation>,
}

/// Item type schemas in document order, serialized as a map keyed by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemTypeMap(Vec<ItemTypeSchema>);

impl ItemTypeMap {
    pub fn new(item_types: Vec<ItemTypeSchema>) -> Self {
        Self(item_types)
    }

    pub fn get(&self, name: &str) -> Option<&ItemTypeSchema> {
        self.0.iter().find(|t| t.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemTypeSchema> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for ItemTypeMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|t| (t.name.as_str(), t)))
    }
}

/// The assembled schema document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDocument {
    #[serde(rename = "_meta")]
    pub meta: DocumentMeta,
    pub project: ProjectSummary,
    pub version: VersionSummary,
    pub all_versions: Vec<VersionEntry>,
    pub summary: SchemaSummary,
    pub builtin_variables: BuiltinCatalog,
    pub item_types: ItemTypeMap,
    pub relation_types: Vec<RelationEdge>,
}

impl SchemaDocument {
    /// Render the document as pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
