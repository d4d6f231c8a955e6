//! Item type discovery and per-type record aggregation

mod aggregator;

pub use aggregator::{RecordAggregator, TypeRecords, infer_short_name};

use std::collections::BTreeSet;

use serde_json::Value;

use crate::source::type_query_expression;

/// Type tag reserved for records whose type could not be determined
pub const PLACEHOLDER_TYPE: &str = "Unknown";

/// An item type found while sampling, with its query expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredType {
    pub name: String,
    pub query: String,
}

impl DiscoveredType {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let query = type_query_expression(&name);
        Self { name, query }
    }
}

/// Collects the distinct type tags of a bounded record sample
#[derive(Debug, Default)]
pub struct TypeDiscovery {
    names: BTreeSet<String>,
    records_seen: usize,
}

impl TypeDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe one record in source JSON form; non-objects are ignored
    pub fn observe(&mut self, record: &Value) {
        let Some(obj) = record.as_object() else {
            return;
        };
        self.records_seen += 1;

        if let Some(name) = obj.get("type").and_then(Value::as_str)
            && !name.is_empty()
            && name != PLACEHOLDER_TYPE
        {
            self.names.insert(name.to_string());
        }
    }

    pub fn observe_all<'a>(&mut self, records: impl IntoIterator<Item = &'a Value>) {
        for record in records {
            self.observe(record);
        }
    }

    /// Records observed so far
    pub fn records_seen(&self) -> usize {
        self.records_seen
    }

    /// Discovered types, ordered by name
    pub fn finish(self) -> Vec<DiscoveredType> {
        self.names.into_iter().map(DiscoveredType::new).collect()
    }
}
