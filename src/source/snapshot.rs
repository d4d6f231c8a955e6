//! JSON snapshot record source
//!
//! Serves the [`RecordSource`] contract from a snapshot file captured
//! earlier, so schema extraction can run offline:
//!
//! ```json
//! {
//!   "project": {"id": "KXPRJ1", "name": "Infusion Pump"},
//!   "versions": [{"id": "KXVER1", "name": "1.0", "isReleased": true}],
//!   "items": [{"id": "KXITM1"}],
//!   "itemRecords": {"KXITM1": [{"type": "Requirement"}]},
//!   "records": [{"type": "Requirement", "title": "..."}]
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::fs;
use tracing::info;

use super::memory::InMemoryRecordSource;
use super::{RecordPage, RecordQuery, RecordSource, SourceError};
use crate::models::{ItemRef, ProjectInfo, VersionInfo};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    #[serde(default)]
    project: Option<ProjectInfo>,
    #[serde(default)]
    versions: Option<Vec<VersionInfo>>,
    #[serde(default)]
    items: Vec<ItemRef>,
    #[serde(default)]
    item_records: HashMap<String, Vec<Value>>,
    #[serde(default)]
    records: Vec<Value>,
}

/// Record source reading a JSON snapshot file
#[derive(Debug)]
pub struct SnapshotRecordSource {
    path: PathBuf,
    inner: InMemoryRecordSource,
}

impl SnapshotRecordSource {
    /// Load a snapshot from disk
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();
        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| SourceError::IoError(format!("{}: {}", path.display(), e)))?;
        let source = Self::from_json_str(&content)?;

        info!(
            path = %path.display(),
            records = source.inner.record_count(),
            "Loaded record snapshot"
        );

        Ok(Self {
            path,
            inner: source.inner,
        })
    }

    /// Parse a snapshot held in memory
    pub fn from_json_str(content: &str) -> Result<Self, SourceError> {
        let snapshot: Snapshot = serde_json::from_str(content)?;
        Ok(Self {
            path: PathBuf::new(),
            inner: InMemoryRecordSource::from_parts(
                snapshot.project,
                snapshot.versions,
                snapshot.items,
                snapshot.item_records,
                snapshot.records,
            ),
        })
    }

    /// Path the snapshot was loaded from (empty for in-memory snapshots)
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordSource for SnapshotRecordSource {
    async fn project(&self, project_id: &str) -> Result<ProjectInfo, SourceError> {
        self.inner.project(project_id).await
    }

    async fn versions(&self, project_id: &str) -> Result<Vec<VersionInfo>, SourceError> {
        self.inner.versions(project_id).await
    }

    async fn list_items(
        &self,
        project_id: &str,
        max_results: usize,
    ) -> Result<Vec<ItemRef>, SourceError> {
        self.inner.list_items(project_id, max_results).await
    }

    async fn item_records(
        &self,
        project_id: &str,
        item_id: &str,
    ) -> Result<Vec<Value>, SourceError> {
        self.inner.item_records(project_id, item_id).await
    }

    async fn query_records(
        &self,
        project_id: &str,
        query: &RecordQuery,
    ) -> Result<RecordPage, SourceError> {
        self.inner.query_records(project_id, query).await
    }
}
