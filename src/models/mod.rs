//! Models module for the SDK
//!
//! Defines the record, project and version types exchanged with record sources.

pub mod project;
pub mod record;

pub use project::{ItemRef, ProjectInfo, VersionInfo, select_version};
pub use record::{
    FieldEntry, FieldValue, RawRecord, RelationEntry, STANDARD_ATTRIBUTES, TypeHint,
    UNKNOWN_RELATION,
};
