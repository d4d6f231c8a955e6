//! Relation graph summary
//!
//! Tallies relation edges across all item types into a global catalog keyed
//! by relation name, and derives each type's outgoing relations from it.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::models::RawRecord;

/// Template expression selecting a record's relations of one name
pub fn relation_access_pattern(relation_type: &str) -> String {
    format!("relations | where('type', '{}')", relation_type)
}

/// Aggregated edges of one relation name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationEdge {
    pub relation_type: String,
    /// Types whose records carry this relation
    pub from_types: BTreeSet<String>,
    /// Reserved; never populated
    pub to_types: BTreeSet<String>,
    pub count: usize,
    pub access_pattern: String,
}

impl RelationEdge {
    fn new(relation_type: &str) -> Self {
        Self {
            relation_type: relation_type.to_string(),
            from_types: BTreeSet::new(),
            to_types: BTreeSet::new(),
            count: 0,
            access_pattern: relation_access_pattern(relation_type),
        }
    }
}

/// A relation leaving records of one type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingRelation {
    pub relation: String,
    pub access_pattern: String,
}

/// Tallies relation entries in first-discovered order
#[derive(Debug, Default)]
pub struct RelationGraphBuilder {
    edges: Vec<RelationEdge>,
    index: HashMap<String, usize>,
}

impl RelationGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every relation entry of the given records as leaving `type_name`
    pub fn observe(&mut self, type_name: &str, records: &[RawRecord]) {
        for relation in records.iter().flat_map(|r| r.relations.iter()) {
            let idx = match self.index.get(&relation.relation_type) {
                Some(idx) => *idx,
                None => {
                    self.edges.push(RelationEdge::new(&relation.relation_type));
                    let idx = self.edges.len() - 1;
                    self.index.insert(relation.relation_type.clone(), idx);
                    idx
                }
            };

            let edge = &mut self.edges[idx];
            edge.count += 1;
            if !edge.from_types.contains(type_name) {
                edge.from_types.insert(type_name.to_string());
            }
        }
    }

    pub fn finish(self) -> RelationGraph {
        RelationGraph { edges: self.edges }
    }
}

/// Completed relation catalog, in first-discovered order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationGraph {
    edges: Vec<RelationEdge>,
}

impl RelationGraph {
    pub fn edges(&self) -> &[RelationEdge] {
        &self.edges
    }

    /// Sum of all relation counts
    pub fn total_count(&self) -> usize {
        self.edges.iter().map(|e| e.count).sum()
    }

    /// Relations whose source set contains `type_name`, in catalog order
    pub fn outgoing_for(&self, type_name: &str) -> Vec<OutgoingRelation> {
        self.edges
            .iter()
            .filter(|edge| edge.from_types.contains(type_name))
            .map(|edge| OutgoingRelation {
                relation: edge.relation_type.clone(),
                access_pattern: edge.access_pattern.clone(),
            })
            .collect()
    }

    /// Edges by count descending, ties kept in discovery order, capped
    pub fn into_ranked(self, cap: usize) -> Vec<RelationEdge> {
        let mut edges = self.edges;
        edges.sort_by(|a, b| b.count.cmp(&a.count));
        edges.truncate(cap);
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with(relations: &[&str]) -> RawRecord {
        relations
            .iter()
            .fold(RawRecord::new("any"), |r, name| r.with_relation(*name, Some("KXITM1")))
    }

    #[test]
    fn test_counts_and_sources() {
        let mut builder = RelationGraphBuilder::new();
        builder.observe("Requirement", &[record_with(&["IMPLEMENTS", "TESTS"])]);
        builder.observe("Test Case", &[record_with(&["TESTS"]), record_with(&["TESTS"])]);
        let graph = builder.finish();

        assert_eq!(graph.total_count(), 4);
        let tests = &graph.edges()[1];
        assert_eq!(tests.relation_type, "TESTS");
        assert_eq!(tests.count, 3);
        assert_eq!(
            tests.from_types.iter().collect::<Vec<_>>(),
            vec!["Requirement", "Test Case"]
        );
        assert!(tests.to_types.is_empty());
        assert_eq!(tests.access_pattern, "relations | where('type', 'TESTS')");
    }

    #[test]
    fn test_outgoing_relations() {
        let mut builder = RelationGraphBuilder::new();
        builder.observe("Requirement", &[record_with(&["IMPLEMENTS", "TESTS"])]);
        builder.observe("Risk", &[record_with(&["MITIGATES"])]);
        let graph = builder.finish();

        let outgoing: Vec<_> = graph
            .outgoing_for("Requirement")
            .into_iter()
            .map(|o| o.relation)
            .collect();
        assert_eq!(outgoing, vec!["IMPLEMENTS", "TESTS"]);
        assert!(graph.outgoing_for("Anomaly").is_empty());
    }

    #[test]
    fn test_ranking_is_stable_and_capped() {
        let mut builder = RelationGraphBuilder::new();
        builder.observe(
            "Requirement",
            &[record_with(&["B", "A", "C", "C", "D", "A", "B"])],
        );
        let ranked = builder.finish().into_ranked(3);

        let names: Vec<_> = ranked.iter().map(|e| e.relation_type.as_str()).collect();
        // B, A and C tie at two; discovery order breaks the tie, D is capped away
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_serialization_shape() {
        let mut builder = RelationGraphBuilder::new();
        builder.observe("Risk", &[record_with(&["MITIGATES"])]);
        let edge = builder.finish().into_ranked(20).remove(0);

        let value = serde_json::to_value(&edge).unwrap();
        assert_eq!(value["relationType"], "MITIGATES");
        assert_eq!(value["fromTypes"], serde_json::json!(["Risk"]));
        assert_eq!(value["toTypes"], serde_json::json!([]));
        assert_eq!(value["count"], 1);
    }
}
