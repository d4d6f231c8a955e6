//! Record source abstraction
//!
//! Defines the RecordSource trait through which the extractor retrieves
//! project metadata and item records:
//! - InMemoryRecordSource: records held in memory (tests, embedding callers)
//! - SnapshotRecordSource: a JSON snapshot file on disk (feature `native-fs`)

use async_trait::async_trait;
use serde_json::Value;

use crate::models::{ItemRef, ProjectInfo, VersionInfo};

/// Error type for record source operations
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for SourceError {
    fn from(e: serde_json::Error) -> Self {
        SourceError::SerializationError(e.to_string())
    }
}

impl From<std::io::Error> for SourceError {
    fn from(e: std::io::Error) -> Self {
        SourceError::IoError(e.to_string())
    }
}

/// Build the query expression selecting every record of a type.
///
/// Names containing whitespace are quoted.
pub fn type_query_expression(type_name: &str) -> String {
    if type_name.chars().any(char::is_whitespace) {
        format!("type:\"{}\"", type_name)
    } else {
        format!("type:{}", type_name)
    }
}

/// Record query against a source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    /// Query expression, e.g. `type:Requirement`
    pub expression: String,
    /// Version scope (`None` queries across all versions)
    pub version_id: Option<String>,
    pub start_at: usize,
    pub max_results: usize,
}

impl RecordQuery {
    pub fn new(expression: impl Into<String>, max_results: usize) -> Self {
        Self {
            expression: expression.into(),
            version_id: None,
            start_at: 0,
            max_results,
        }
    }

    pub fn with_version(mut self, version_id: impl Into<String>) -> Self {
        self.version_id = Some(version_id.into());
        self
    }

    /// Type name selected by a `type:` expression, if that is what this is
    pub fn type_name(&self) -> Option<&str> {
        let rest = self.expression.trim().strip_prefix("type:")?;
        let name = rest
            .strip_prefix('"')
            .and_then(|r| r.strip_suffix('"'))
            .unwrap_or(rest);
        (!name.is_empty()).then_some(name)
    }
}

/// One page of query results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPage {
    /// Raw records; parsed leniently downstream
    pub records: Vec<Value>,
    /// Total matches reported by the source, when it reports one
    pub total: Option<usize>,
}

impl RecordPage {
    pub fn new(records: Vec<Value>) -> Self {
        Self {
            records,
            total: None,
        }
    }

    pub fn with_total(mut self, total: usize) -> Self {
        self.total = Some(total);
        self
    }
}

/// Trait for record sources
///
/// Every call is independent: a failure in one call says nothing about the
/// others, and callers decide which failures are fatal.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch project metadata
    async fn project(&self, project_id: &str) -> Result<ProjectInfo, SourceError>;

    /// List all versions of a project
    async fn versions(&self, project_id: &str) -> Result<Vec<VersionInfo>, SourceError>;

    /// List up to `max_results` items of a project
    async fn list_items(
        &self,
        project_id: &str,
        max_results: usize,
    ) -> Result<Vec<ItemRef>, SourceError>;

    /// Fetch the records belonging to one item
    async fn item_records(&self, project_id: &str, item_id: &str)
    -> Result<Vec<Value>, SourceError>;

    /// Run a record query
    async fn query_records(
        &self,
        project_id: &str,
        query: &RecordQuery,
    ) -> Result<RecordPage, SourceError>;
}

pub mod memory;
#[cfg(feature = "native-fs")]
pub mod snapshot;

pub use memory::InMemoryRecordSource;
#[cfg(feature = "native-fs")]
pub use snapshot::SnapshotRecordSource;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_expression_quotes_whitespace() {
        assert_eq!(type_query_expression("Requirement"), "type:Requirement");
        assert_eq!(
            type_query_expression("Software Item Spec"),
            "type:\"Software Item Spec\""
        );
    }

    #[test]
    fn test_query_type_name() {
        assert_eq!(
            RecordQuery::new("type:Requirement", 10).type_name(),
            Some("Requirement")
        );
        assert_eq!(
            RecordQuery::new("type:\"Test Case\"", 10).type_name(),
            Some("Test Case")
        );
        assert_eq!(RecordQuery::new("status:Open", 10).type_name(), None);
        assert_eq!(RecordQuery::new("type:", 10).type_name(), None);
    }
}
