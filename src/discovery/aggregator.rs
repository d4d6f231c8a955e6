//! Per-type record aggregation

use tracing::debug;

use super::DiscoveredType;
use crate::models::{FieldValue, RawRecord};
use crate::source::RecordPage;

/// Label of the field entry carrying a document identifier such as `REQ-12`
pub const ID_LABEL: &str = "ID";

const ID_SEPARATOR: char = '-';

/// All records retrieved for one item type
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRecords {
    pub name: String,
    pub query: String,
    /// Total reported by the source (may exceed `records.len()`)
    pub total: usize,
    pub short_name: Option<String>,
    pub records: Vec<RawRecord>,
}

/// Turns fetched record pages into per-type record sets
#[derive(Debug, Clone, Copy)]
pub struct RecordAggregator {
    short_name_scan: usize,
    max_short_name_len: usize,
}

impl RecordAggregator {
    pub fn new(short_name_scan: usize, max_short_name_len: usize) -> Self {
        Self {
            short_name_scan,
            max_short_name_len,
        }
    }

    /// Aggregate a fetched page. Returns `None` when it holds no usable
    /// records, which drops the type.
    pub fn aggregate(&self, discovered: DiscoveredType, page: RecordPage) -> Option<TypeRecords> {
        let fetched = page.records.len();
        let records: Vec<RawRecord> = page.records.iter().filter_map(RawRecord::from_json).collect();

        if records.len() < fetched {
            debug!(
                item_type = %discovered.name,
                skipped = fetched - records.len(),
                "Skipped malformed records"
            );
        }
        if records.is_empty() {
            debug!(item_type = %discovered.name, "No records, dropping type");
            return None;
        }

        let total = page.total.unwrap_or(records.len());
        let short_name = infer_short_name(&records, self.short_name_scan, self.max_short_name_len);

        Some(TypeRecords {
            name: discovered.name,
            query: discovered.query,
            total,
            short_name,
            records,
        })
    }
}

impl Default for RecordAggregator {
    fn default() -> Self {
        Self::new(20, 6)
    }
}

/// Infer a short alphabetic prefix from the `ID` field of the first `scan`
/// records. The first acceptable prefix wins.
pub fn infer_short_name(records: &[RawRecord], scan: usize, max_len: usize) -> Option<String> {
    records
        .iter()
        .take(scan)
        .flat_map(|record| record.fields.iter())
        .filter(|entry| entry.label == ID_LABEL)
        .filter_map(|entry| entry.present_value())
        .find_map(|value| id_prefix(value, max_len))
}

fn id_prefix(value: &FieldValue, max_len: usize) -> Option<String> {
    let id = value.canonical();
    let (prefix, _) = id.split_once(ID_SEPARATOR)?;
    let len = prefix.chars().count();

    ((1..=max_len).contains(&len) && prefix.chars().all(char::is_alphabetic))
        .then(|| prefix.to_string())
}
