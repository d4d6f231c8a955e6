//! Error types for field inference

use thiserror::Error;

/// Errors that can occur during field inference
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InferenceError {
    /// Invalid record structure (not an object at root)
    #[error("Invalid record structure: expected object at root, found {0}")]
    InvalidStructure(String),

    /// No records to infer from
    #[error("No records provided for inference")]
    NoRecords,
}
