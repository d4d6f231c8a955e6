//! Item Schema SDK - Schema inference over heterogeneous item records
//!
//! Provides unified interfaces for:
//! - Record retrieval (via record sources)
//! - Item type discovery and per-type record aggregation
//! - Field inference (data types, access expressions, value domains, fill rates)
//! - Sample records and the relation catalog
//! - Schema document assembly and end-to-end extraction

pub mod discovery;
pub mod extractor;
pub mod inference;
pub mod models;
pub mod relations;
pub mod samples;
pub mod schema;
pub mod source;

// Re-export commonly used types
pub use source::{InMemoryRecordSource, RecordPage, RecordQuery, RecordSource, SourceError};
#[cfg(feature = "native-fs")]
pub use source::SnapshotRecordSource;

pub use discovery::{DiscoveredType, RecordAggregator, TypeDiscovery, TypeRecords};
pub use extractor::{ConfigError, ExtractError, ExtractorConfig, SchemaExtractor};
pub use inference::{DataType, InferenceConfig, InferenceError, InferredField, ValueDomain, infer_type};
pub use relations::{RelationEdge, RelationGraph, RelationGraphBuilder};
pub use samples::{SampleRecord, SampleRecordBuilder};
pub use schema::{ItemTypeSchema, SchemaAssembler, SchemaDocument};

// Re-export models
pub use models::{FieldEntry, FieldValue, ItemRef, ProjectInfo, RawRecord, RelationEntry, TypeHint, VersionInfo};
