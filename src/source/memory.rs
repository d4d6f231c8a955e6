//! In-memory record source

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{RecordPage, RecordQuery, RecordSource, SourceError};
use crate::models::{ItemRef, ProjectInfo, VersionInfo};

/// Record source backed by values held in memory
///
/// Type queries match records whose `type` tag equals the queried name.
/// Individual calls can be made to fail to exercise degraded retrieval.
#[derive(Debug, Default)]
pub struct InMemoryRecordSource {
    project: Option<ProjectInfo>,
    versions: Option<Vec<VersionInfo>>,
    items: Vec<ItemRef>,
    item_records: HashMap<String, Vec<Value>>,
    records: Vec<Value>,
    failing_items: HashSet<String>,
    failing_types: HashSet<String>,
    queries: Mutex<Vec<RecordQuery>>,
}

impl InMemoryRecordSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(mut self, project: ProjectInfo) -> Self {
        self.project = Some(project);
        self
    }

    pub fn with_versions(mut self, versions: Vec<VersionInfo>) -> Self {
        self.versions = Some(versions);
        self
    }

    /// Register an item and the records the item listing resolves to
    pub fn with_item(mut self, item_id: impl Into<String>, records: Vec<Value>) -> Self {
        let item_id = item_id.into();
        self.items.push(ItemRef::new(item_id.clone()));
        self.item_records.insert(item_id, records);
        self
    }

    /// Add records served by type queries
    pub fn with_records(mut self, records: impl IntoIterator<Item = Value>) -> Self {
        self.records.extend(records);
        self
    }

    /// Make `item_records` fail for this item
    pub fn with_failing_item(mut self, item_id: impl Into<String>) -> Self {
        self.failing_items.insert(item_id.into());
        self
    }

    /// Make type queries for this type fail
    pub fn with_failing_type(mut self, type_name: impl Into<String>) -> Self {
        self.failing_types.insert(type_name.into());
        self
    }

    /// Number of records served by type queries
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Queries received so far, in arrival order
    pub fn queries(&self) -> Vec<RecordQuery> {
        self.queries
            .lock()
            .map(|queries| queries.clone())
            .unwrap_or_default()
    }

    pub(crate) fn from_parts(
        project: Option<ProjectInfo>,
        versions: Option<Vec<VersionInfo>>,
        items: Vec<ItemRef>,
        item_records: HashMap<String, Vec<Value>>,
        records: Vec<Value>,
    ) -> Self {
        Self {
            project,
            versions,
            items,
            item_records,
            records,
            ..Default::default()
        }
    }

    fn matches_type(record: &Value, type_name: &str) -> bool {
        record.get("type").and_then(Value::as_str) == Some(type_name)
    }
}

#[async_trait]
impl RecordSource for InMemoryRecordSource {
    async fn project(&self, project_id: &str) -> Result<ProjectInfo, SourceError> {
        self.project
            .clone()
            .filter(|p| p.id == project_id)
            .ok_or_else(|| SourceError::NotFound(format!("project {}", project_id)))
    }

    async fn versions(&self, project_id: &str) -> Result<Vec<VersionInfo>, SourceError> {
        self.versions
            .clone()
            .ok_or_else(|| SourceError::NotFound(format!("versions of {}", project_id)))
    }

    async fn list_items(
        &self,
        _project_id: &str,
        max_results: usize,
    ) -> Result<Vec<ItemRef>, SourceError> {
        Ok(self.items.iter().take(max_results).cloned().collect())
    }

    async fn item_records(
        &self,
        _project_id: &str,
        item_id: &str,
    ) -> Result<Vec<Value>, SourceError> {
        if self.failing_items.contains(item_id) {
            return Err(SourceError::NetworkError(format!(
                "records of item {} unavailable",
                item_id
            )));
        }
        self.item_records
            .get(item_id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(format!("item {}", item_id)))
    }

    async fn query_records(
        &self,
        _project_id: &str,
        query: &RecordQuery,
    ) -> Result<RecordPage, SourceError> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.clone());
        }

        let type_name = query.type_name().ok_or_else(|| {
            SourceError::InvalidResponse(format!("unsupported query: {}", query.expression))
        })?;
        if self.failing_types.contains(type_name) {
            return Err(SourceError::NetworkError(format!(
                "query for {} failed",
                type_name
            )));
        }

        let matching: Vec<&Value> = self
            .records
            .iter()
            .filter(|r| Self::matches_type(r, type_name))
            .collect();
        let total = matching.len();
        let records = matching
            .into_iter()
            .skip(query.start_at)
            .take(query.max_results)
            .cloned()
            .collect();

        Ok(RecordPage::new(records).with_total(total))
    }
}
