//! Schema extraction executor

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rayon::prelude::*;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use super::config::ExtractorConfig;
use super::error::{ExtractError, ExtractResult};
use crate::discovery::{DiscoveredType, RecordAggregator, TypeDiscovery, TypeRecords};
use crate::inference::InferenceConfig;
use crate::models::select_version;
use crate::relations::RelationGraphBuilder;
use crate::schema::{AssemblyInput, ItemTypeSchema, SchemaAssembler, SchemaDocument, build_item_type};
use crate::source::{RecordQuery, RecordSource};

/// Runs discovery, retrieval, inference and assembly against one source
pub struct SchemaExtractor<S: RecordSource + 'static> {
    source: Arc<S>,
    config: ExtractorConfig,
}

impl<S: RecordSource + 'static> SchemaExtractor<S> {
    /// Create a new extractor
    pub fn new(source: S, config: ExtractorConfig) -> ExtractResult<Self> {
        Self::with_shared_source(Arc::new(source), config)
    }

    /// Create an extractor over a source that is also used elsewhere
    pub fn with_shared_source(source: Arc<S>, config: ExtractorConfig) -> ExtractResult<Self> {
        config.validate()?;
        Ok(Self { source, config })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Extract the schema document of a project.
    ///
    /// Fails only when the project itself cannot be fetched; every other
    /// source failure is logged and leaves a gap in the document.
    pub async fn extract(&self, project_id: &str) -> ExtractResult<SchemaDocument> {
        let run_id = Uuid::new_v4();
        let span = info_span!("schema_extract", run_id = %run_id, project_id = %project_id);
        self.run(project_id).instrument(span).await
    }

    async fn run(&self, project_id: &str) -> ExtractResult<SchemaDocument> {
        let start = Instant::now();
        info!("Starting schema extraction");

        let project = self.source.project(project_id).await.map_err(|source| {
            error!(error = %source, "Failed to fetch project");
            ExtractError::ProjectUnavailable {
                project_id: project_id.to_string(),
                source,
            }
        })?;

        let versions = match self.source.versions(project_id).await {
            Ok(versions) => versions,
            Err(e) => {
                warn!(error = %e, "Failed to fetch versions, continuing without");
                Vec::new()
            }
        };
        let selected_version = select_version(&versions, self.config.version_id.as_deref()).cloned();
        debug!(
            versions = versions.len(),
            selected = ?selected_version.as_ref().map(|v| v.name.as_str()),
            "Resolved version"
        );

        let discovered = self.discover_types(project_id).await;
        let fetched = self.fetch_records(project_id, discovered).await;

        let inference = self.config.inference.clone();
        let (fetched, mut item_types) = tokio::task::spawn_blocking(move || {
            let item_types = infer_item_types(&fetched, &inference);
            (fetched, item_types)
        })
        .await
        .map_err(|e| ExtractError::TaskFailed(e.to_string()))?;

        // BTreeMap iteration keeps the tally in type name order
        let mut builder = RelationGraphBuilder::new();
        for (name, type_records) in &fetched {
            builder.observe(name, &type_records.records);
        }
        let relations = builder.finish();
        for item_type in &mut item_types {
            item_type.outgoing_relations = relations.outgoing_for(&item_type.name);
        }

        let document = SchemaAssembler::new(self.config.relation_cap).assemble(AssemblyInput {
            project,
            versions,
            selected_version,
            item_types,
            relations,
            generated_at: Utc::now(),
        });

        info!(
            item_types = document.summary.item_type_count,
            total_items = document.summary.total_items,
            total_relations = document.summary.total_relations,
            duration_ms = start.elapsed().as_millis() as u64,
            "Schema extraction completed"
        );

        Ok(document)
    }

    /// Sample items and collect the type tags of their records
    async fn discover_types(&self, project_id: &str) -> Vec<DiscoveredType> {
        let items = match self
            .source
            .list_items(project_id, self.config.discovery.list_limit)
            .await
        {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "Failed to list items, no types discovered");
                return Vec::new();
            }
        };

        let mut discovery = TypeDiscovery::new();
        for item in items.iter().take(self.config.discovery.sample_items) {
            let Some(item_id) = item.id.as_deref() else {
                continue;
            };

            self.pause().await;
            match self.source.item_records(project_id, item_id).await {
                Ok(records) => discovery.observe_all(&records),
                Err(e) => warn!(item_id = %item_id, error = %e, "Failed to fetch item records"),
            }
        }

        let records_seen = discovery.records_seen();
        let types = discovery.finish();
        info!(
            items = items.len(),
            records_seen,
            types = ?types.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
            "Discovered item types"
        );
        types
    }

    /// Fetch every discovered type with bounded concurrency. Types whose
    /// query fails or returns nothing are left out.
    async fn fetch_records(
        &self,
        project_id: &str,
        discovered: Vec<DiscoveredType>,
    ) -> BTreeMap<String, TypeRecords> {
        let semaphore = Arc::new(Semaphore::new(self.config.fetch.max_concurrent));
        let aggregator = RecordAggregator::new(
            self.config.discovery.short_name_scan,
            self.config.discovery.max_short_name_len,
        );
        let delay = self.config.request_delay();

        let mut tasks = JoinSet::new();
        for item_type in discovered {
            let source = Arc::clone(&self.source);
            let semaphore = Arc::clone(&semaphore);
            let project_id = project_id.to_string();
            // type queries are never scoped to the selected version
            let query = RecordQuery::new(item_type.query.clone(), self.config.fetch.page_size);

            tasks.spawn(
                async move {
                    let _permit = semaphore.acquire_owned().await.ok()?;
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    match source.query_records(&project_id, &query).await {
                        Ok(page) => aggregator.aggregate(item_type, page),
                        Err(e) => {
                            warn!(item_type = %item_type.name, error = %e, "Failed to fetch records, dropping type");
                            None
                        }
                    }
                }
                .in_current_span(),
            );
        }

        let mut fetched = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Some(type_records)) => {
                    debug!(
                        item_type = %type_records.name,
                        records = type_records.records.len(),
                        total = type_records.total,
                        "Fetched records"
                    );
                    fetched.insert(type_records.name.clone(), type_records);
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "Record fetch task failed"),
            }
        }
        fetched
    }

    async fn pause(&self) {
        let delay = self.config.request_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Infer every fetched type in parallel
fn infer_item_types(
    fetched: &BTreeMap<String, TypeRecords>,
    config: &InferenceConfig,
) -> Vec<ItemTypeSchema> {
    fetched
        .par_iter()
        .filter_map(|(name, type_records)| match build_item_type(type_records, config) {
            Ok(item_type) => Some(item_type),
            Err(e) => {
                warn!(item_type = %name, error = %e, "Inference failed, dropping type");
                None
            }
        })
        .collect()
}
