//! End-to-end schema extraction
//!
//! The extractor drives a [`RecordSource`](crate::source::RecordSource)
//! through the whole run:
//!
//! 1. **Project**: fetch project metadata (the only fatal step)
//! 2. **Versions**: list versions and select the one the document describes
//! 3. **Discover**: sample items and collect their record types
//! 4. **Fetch**: query every type's records with bounded concurrency
//! 5. **Infer**: classify each type's fields in parallel
//! 6. **Relate**: tally relation edges across all types
//! 7. **Assemble**: build the schema document
//!
//! # Example
//!
//! ```rust,ignore
//! use item_schema_sdk::extractor::{ExtractorConfig, SchemaExtractor};
//! use item_schema_sdk::source::SnapshotRecordSource;
//!
//! let source = SnapshotRecordSource::open("snapshot.json").await?;
//! let config = ExtractorConfig::load("extractor.toml")?;
//! let extractor = SchemaExtractor::new(source, config)?;
//!
//! let document = extractor.extract("KXPRJ1").await?;
//! println!("{}", document.to_json_pretty()?);
//! ```

mod config;
mod error;
mod executor;

pub use config::{DiscoveryConfig, ExtractorConfig, FetchConfig};
pub use error::{ConfigError, ExtractError, ExtractResult};
pub use executor::SchemaExtractor;
