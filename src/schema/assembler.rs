//! Schema document assembly
//!
//! Orders, caps and merges per-type results into the final document. No
//! inference happens here.

use chrono::{DateTime, Utc};

use super::builtins::BuiltinCatalog;
use super::document::{
    DOCUMENT_PURPOSE, DOCUMENT_VERSION, DocumentMeta, ItemTypeMap, ItemTypeSchema, ProjectSummary,
    SchemaDocument, SchemaSummary, USAGE_NOTES, VersionEntry, VersionSummary,
};
use crate::discovery::TypeRecords;
use crate::inference::{InferenceConfig, InferenceError, infer_type};
use crate::models::{ProjectInfo, VersionInfo};
use crate::relations::RelationGraph;
use crate::samples::{SampleRecordBuilder, truncate_display};

/// Timestamp layout of `generatedAt`
pub const GENERATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Build the schema of one item type from its records.
///
/// Outgoing relations are attached later, once every type has been tallied.
pub fn build_item_type(
    type_records: &TypeRecords,
    config: &InferenceConfig,
) -> Result<ItemTypeSchema, InferenceError> {
    let inferred = infer_type(&type_records.records, config)?;
    let sample_records =
        SampleRecordBuilder::from_config(config).build(&type_records.records, &inferred.fields);

    Ok(ItemTypeSchema {
        name: type_records.name.clone(),
        query: type_records.query.clone(),
        count: type_records.total,
        fields: inferred.fields,
        sample_records,
        short_name: type_records.short_name.clone(),
        statuses: inferred.statuses,
        outgoing_relations: Vec::new(),
    })
}

/// Everything the assembler merges
#[derive(Debug, Clone)]
pub struct AssemblyInput {
    pub project: ProjectInfo,
    pub versions: Vec<VersionInfo>,
    pub selected_version: Option<VersionInfo>,
    pub item_types: Vec<ItemTypeSchema>,
    pub relations: RelationGraph,
    pub generated_at: DateTime<Utc>,
}

/// Assembles the final document
#[derive(Debug, Clone, Copy)]
pub struct SchemaAssembler {
    relation_cap: usize,
    description_length: usize,
}

impl SchemaAssembler {
    pub fn new(relation_cap: usize) -> Self {
        Self {
            relation_cap,
            description_length: 200,
        }
    }

    pub fn with_description_length(mut self, length: usize) -> Self {
        self.description_length = length;
        self
    }

    pub fn assemble(&self, input: AssemblyInput) -> SchemaDocument {
        let AssemblyInput {
            project,
            versions,
            selected_version,
            mut item_types,
            relations,
            generated_at,
        } = input;

        // count descending, name ascending on ties
        item_types.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

        let summary = SchemaSummary {
            total_items: item_types.iter().map(|t| t.count).sum(),
            item_type_count: item_types.len(),
            total_relations: relations.total_count(),
        };

        SchemaDocument {
            meta: DocumentMeta {
                generated_at: generated_at.format(GENERATED_AT_FORMAT).to_string(),
                purpose: DOCUMENT_PURPOSE.to_string(),
                version: DOCUMENT_VERSION.to_string(),
                notes: USAGE_NOTES.iter().map(|n| n.to_string()).collect(),
            },
            project: ProjectSummary {
                description: truncate_display(
                    project.description.as_deref().unwrap_or_default(),
                    self.description_length,
                ),
                id: project.id,
                name: project.name,
            },
            version: VersionSummary::from(selected_version.as_ref()),
            all_versions: versions.iter().map(VersionEntry::from).collect(),
            summary,
            builtin_variables: BuiltinCatalog::default(),
            item_types: ItemTypeMap::new(item_types),
            relation_types: relations.into_ranked(self.relation_cap),
        }
    }
}

impl Default for SchemaAssembler {
    fn default() -> Self {
        Self::new(20)
    }
}
