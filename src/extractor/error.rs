//! Error types for schema extraction
//!
//! Only a missing project aborts a run. Every other retrieval failure is
//! logged and degrades to "no data" for that call.

use std::path::PathBuf;

use thiserror::Error;

use crate::source::SourceError;

/// Errors raised while loading or validating extractor configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration text could not be parsed
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Configuration file could not be read
    #[error("Failed to read configuration {path}: {message}")]
    IoError { path: PathBuf, message: String },

    /// A setting holds an unusable value
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::ParseError(e.to_string())
    }
}

/// Errors that abort a schema extraction run
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Extractor configuration is unusable
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Project metadata could not be retrieved
    #[error("Failed to fetch project {project_id}")]
    ProjectUnavailable {
        project_id: String,
        #[source]
        source: SourceError,
    },

    /// A background inference task did not complete
    #[error("Inference task failed: {0}")]
    TaskFailed(String),
}

/// Result type for extraction operations
pub type ExtractResult<T> = Result<T, ExtractError>;
