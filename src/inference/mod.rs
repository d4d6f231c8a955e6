//! Field inference engine for item records
//!
//! This module folds the records of one item type into per-field
//! observations and classifies every field.
//!
//! ## Features
//!
//! - **Type resolution** - Fixed-priority rule over labels, values and declared hints
//! - **Rich text detection** - Narrative labels, HTML markup, long values
//! - **Access expressions** - Plain and rich template accessors per field
//! - **Value domains** - Enumerated categories or example values
//! - **Fill rates** - Share of records carrying each field
//!
//! ## Example
//!
//! ```rust
//! use item_schema_sdk::inference::{InferenceConfig, infer_type};
//! use item_schema_sdk::models::{RawRecord, TypeHint};
//!
//! let records = vec![
//!     RawRecord::new("Requirement").with_field("Status", "Open", TypeHint::String),
//!     RawRecord::new("Requirement").with_field("Status", "Closed", TypeHint::String),
//! ];
//! let inferred = infer_type(&records, &InferenceConfig::default()).unwrap();
//! assert_eq!(inferred.statuses, vec!["Closed", "Open"]);
//! ```

mod config;
mod error;
mod inferrer;
mod richtext;
mod sampler;
mod types;

pub use config::{InferenceConfig, InferenceConfigBuilder};
pub use error::InferenceError;
pub use inferrer::{
    FieldInferrer, STATUS_LABEL, TypeInference, classify_field, infer_type, resolve_data_type,
};
pub use richtext::{
    RICH_TEXT_LABEL_PATTERNS, contains_markup, label_suggests_rich_text, values_suggest_rich_text,
};
pub use sampler::ValueSampler;
pub(crate) use sampler::truncate_chars;
pub use types::{
    Access, DataType, FieldObservation, InferredField, ValueDomain, normalize_field_key,
};
