//! Schema document model and assembly

mod assembler;
mod builtins;
mod document;

pub use assembler::{
    AssemblyInput, GENERATED_AT_FORMAT, SchemaAssembler, build_item_type,
};
pub use builtins::{BUILTIN_GROUPS, BuiltinCatalog, BuiltinGroup, BuiltinVariable};
pub use document::{
    DOCUMENT_PURPOSE, DOCUMENT_VERSION, DocumentMeta, ItemTypeMap, ItemTypeSchema,
    ProjectSummary, SchemaDocument, SchemaSummary, USAGE_NOTES, VersionEntry, VersionSummary,
};
