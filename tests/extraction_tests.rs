//! End-to-end schema extraction tests

use std::time::Duration;

use item_schema_sdk::extractor::{ExtractError, ExtractorConfig, SchemaExtractor};
use item_schema_sdk::inference::DataType;
use item_schema_sdk::models::{ProjectInfo, VersionInfo};
use item_schema_sdk::source::InMemoryRecordSource;
use serde_json::{Value, json};

const PROJECT: &str = "KXPRJ1";

fn config() -> ExtractorConfig {
    ExtractorConfig::new().with_request_delay(Duration::ZERO)
}

fn field(label: &str, value: Value, hint: &str) -> Value {
    json!({"label": label, "value": value, "type": hint})
}

fn record(type_name: &str, title: &str, fields: Vec<Value>) -> Value {
    json!({"type": type_name, "title": title, "fields": fields, "relations": []})
}

fn related(type_name: &str, relations: &[&str]) -> Value {
    let relations: Vec<Value> = relations
        .iter()
        .map(|r| json!({"type": r, "toItem": {"id": "KXITM9"}}))
        .collect();
    json!({"type": type_name, "title": "linked", "fields": [], "relations": relations})
}

/// Source where every record is also reachable through one item per type
fn source_with(records: Vec<Value>) -> InMemoryRecordSource {
    let mut source = InMemoryRecordSource::new()
        .with_project(ProjectInfo::new(PROJECT, "Infusion Pump").with_description("Pump project"))
        .with_versions(vec![VersionInfo::new("KXVER1", "1.0", true)]);

    let mut seen = Vec::new();
    for record in &records {
        let type_name = record["type"].as_str().unwrap_or_default().to_string();
        if !seen.contains(&type_name) {
            source = source.with_item(format!("item-{}", type_name), vec![record.clone()]);
            seen.push(type_name);
        }
    }
    source.with_records(records)
}

async fn extract(source: InMemoryRecordSource) -> item_schema_sdk::SchemaDocument {
    SchemaExtractor::new(source, config())
        .unwrap()
        .extract(PROJECT)
        .await
        .unwrap()
}

mod inference_scenario_tests {
    use super::*;

    #[tokio::test]
    async fn test_status_scenario() {
        let records = ["Open", "Open", "Closed"]
            .iter()
            .map(|s| record("Requirement", "Alarm", vec![field("Status", json!(s), "string")]))
            .collect();
        let doc = extract(source_with(records)).await;

        let requirement = doc.item_types.get("Requirement").unwrap();
        assert_eq!(requirement.count, 3);
        assert_eq!(requirement.statuses, vec!["Closed", "Open"]);

        let value = serde_json::to_value(&doc).unwrap();
        let status = &value["itemTypes"]["Requirement"]["fields"]["Status"];
        assert_eq!(status["uniqueValues"], json!(["Closed", "Open"]));
        assert_eq!(status["access"], json!({"plain": "fieldValue.Status"}));
        assert_eq!(status["isCustomField"], true);
        assert!(status.get("fillRate").is_none());
        assert!(status.get("exampleValues").is_none());
    }

    #[tokio::test]
    async fn test_root_cause_scenario() {
        let records = vec![
            record("Anomaly", "A1", vec![field("Root Cause", json!("Loose cable"), "string")]),
            record("Anomaly", "A2", vec![field("Root Cause", json!("Old firmware"), "string")]),
        ];
        let doc = extract(source_with(records)).await;

        let anomaly = doc.item_types.get("Anomaly").unwrap();
        let root_cause = &anomaly.fields["Root_Cause"];
        assert_eq!(root_cause.data_type, DataType::RichText);
        assert_eq!(root_cause.access.plain, "fieldValue.Root_Cause");
        assert_eq!(root_cause.access.rich.as_deref(), Some("~~fieldContent.Root_Cause"));
        assert!(root_cause.domain.is_empty());

        // rich text never reaches sample records
        assert!(anomaly.sample_records.iter().all(|s| s.get("Root_Cause").is_none()));
    }

    #[tokio::test]
    async fn test_fill_rate_and_high_cardinality() {
        let mut records: Vec<Value> = (0..30)
            .map(|i| {
                record(
                    "Risk",
                    &format!("Risk {}", i),
                    vec![field("Hazard", json!(format!("Hazard {}", i)), "string")],
                )
            })
            .collect();
        records.push(record("Risk", "Risk 30", vec![]));
        let doc = extract(source_with(records)).await;

        let value = serde_json::to_value(&doc).unwrap();
        let hazard = &value["itemTypes"]["Risk"]["fields"]["Hazard"];
        assert_eq!(hazard["fillRate"], "97%");
        assert!(hazard.get("uniqueValues").is_none());
        assert_eq!(hazard["exampleValues"].as_array().unwrap().len(), 5);
        assert_eq!(hazard["exampleValues"][0], "Hazard 0");
    }
}

mod retrieval_tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_project_aborts() {
        let source = source_with(vec![record("Risk", "R1", vec![])]);
        let result = SchemaExtractor::new(source, config())
            .unwrap()
            .extract("KXPRJ404")
            .await;
        assert!(matches!(result, Err(ExtractError::ProjectUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_failed_and_empty_types_dropped() {
        let source = source_with(vec![
            record("Risk", "R1", vec![]),
            record("Requirement", "Q1", vec![]),
        ])
        .with_item("item-ghost", vec![record("Ghost", "G", vec![])])
        .with_failing_type("Requirement");
        let doc = extract(source).await;

        assert_eq!(doc.item_types.names(), vec!["Risk"]);
        assert_eq!(doc.summary.item_type_count, 1);
        assert_eq!(doc.summary.total_items, 1);
    }

    #[tokio::test]
    async fn test_item_failure_isolated_during_discovery() {
        let source = source_with(vec![
            record("Risk", "R1", vec![]),
            record("Requirement", "Q1", vec![]),
        ])
        .with_failing_item("item-Risk");
        let doc = extract(source).await;

        assert_eq!(doc.item_types.names(), vec!["Requirement"]);
    }

    #[tokio::test]
    async fn test_placeholder_type_ignored() {
        let source = source_with(vec![record("Risk", "R1", vec![])])
            .with_item("item-unknown", vec![record("Unknown", "U", vec![])]);
        let doc = extract(source).await;

        assert!(!doc.item_types.contains("Unknown"));
    }

    #[tokio::test]
    async fn test_type_queries_are_unscoped() {
        let source = source_with(vec![
            record("Risk", "R1", vec![]),
            record("Test Case", "T1", vec![]),
        ]);
        let extractor = SchemaExtractor::new(source, config().with_version("KXVER1")).unwrap();
        let doc = extractor.extract(PROJECT).await.unwrap();

        assert_eq!(doc.version.id.as_deref(), Some("KXVER1"));
        let queries = extractor.source().queries();
        assert_eq!(queries.len(), 2);
        assert!(queries.iter().all(|q| q.version_id.is_none()));
        assert!(queries.iter().any(|q| q.expression == "type:\"Test Case\""));
        assert_eq!(
            doc.item_types.get("Test Case").unwrap().query,
            "type:\"Test Case\""
        );
    }

    #[tokio::test]
    async fn test_versions_unavailable() {
        let source = InMemoryRecordSource::new()
            .with_project(ProjectInfo::new(PROJECT, "Pump"))
            .with_item("i1", vec![record("Risk", "R1", vec![])])
            .with_records(vec![record("Risk", "R1", vec![])]);
        let doc = extract(source).await;

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["version"], json!({"id": null, "name": null, "isReleased": null}));
        assert_eq!(value["allVersions"], json!([]));
        assert!(doc.item_types.contains("Risk"));
    }
}

mod relation_tests {
    use super::*;

    #[tokio::test]
    async fn test_relation_catalog_and_outgoing() {
        let doc = extract(source_with(vec![
            related("Risk", &["MITIGATED_BY"]),
            related("Anomaly", &["CAUSED_BY", "MITIGATED_BY"]),
            related("Anomaly", &[]),
        ]))
        .await;

        let names: Vec<_> = doc
            .relation_types
            .iter()
            .map(|r| r.relation_type.as_str())
            .collect();
        assert_eq!(names, vec!["MITIGATED_BY", "CAUSED_BY"]);
        assert_eq!(doc.summary.total_relations, 3);

        let mitigated = &doc.relation_types[0];
        assert_eq!(
            mitigated.from_types.iter().collect::<Vec<_>>(),
            vec!["Anomaly", "Risk"]
        );

        let risk = doc.item_types.get("Risk").unwrap();
        assert_eq!(risk.outgoing_relations.len(), 1);
        assert_eq!(
            risk.outgoing_relations[0].access_pattern,
            "relations | where('type', 'MITIGATED_BY')"
        );
    }

    #[tokio::test]
    async fn test_relation_ties_keep_discovery_order() {
        let doc = extract(source_with(vec![
            related("Anomaly", &["B"]),
            related("Risk", &["A"]),
        ]))
        .await;

        let names: Vec<_> = doc
            .relation_types
            .iter()
            .map(|r| r.relation_type.as_str())
            .collect();
        // types are tallied in name order, so Anomaly's relation wins the tie
        assert_eq!(names, vec!["B", "A"]);
    }
}

mod document_tests {
    use super::*;

    #[tokio::test]
    async fn test_document_shape() {
        let doc = extract(source_with(vec![
            record("Requirement", "Q1", vec![field("ID", json!("REQ-1"), "string")]),
            record("Requirement", "Q2", vec![field("ID", json!("REQ-2"), "string")]),
            record("Risk", "R1", vec![]),
        ]))
        .await;

        let text = doc.to_json_pretty().unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["_meta"]["version"], "2.0.0");
        assert_eq!(value["project"]["name"], "Infusion Pump");
        assert_eq!(value["summary"]["totalItems"], 3);
        assert_eq!(value["summary"]["itemTypeCount"], 2);
        assert!(value["builtinVariables"]["project"].is_object());

        let requirement = &value["itemTypes"]["Requirement"];
        assert_eq!(requirement["kqlQuery"], "type:Requirement");
        assert_eq!(requirement["shortName"], "REQ");
        assert_eq!(requirement["sampleRecords"][0]["title"], "Q1");
        assert_eq!(requirement["sampleRecords"][0]["ID"], "REQ-1");

        let order: Vec<_> = value["itemTypes"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(order, vec!["Requirement", "Risk"]);
    }
}

#[cfg(feature = "native-fs")]
mod snapshot_tests {
    use super::*;
    use item_schema_sdk::source::SnapshotRecordSource;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_extract_from_snapshot_file() {
        let risk = record("Risk", "Overdose", vec![field("Severity", json!("High"), "string")]);
        let snapshot = json!({
            "project": {"id": PROJECT, "name": "Infusion Pump"},
            "versions": [{"id": "KXVER1", "name": "1.0", "isReleased": true}],
            "items": [{"id": "KXITM1"}, {}],
            "itemRecords": {"KXITM1": [risk.clone()]},
            "records": [risk]
        });
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", snapshot).unwrap();

        let source = SnapshotRecordSource::open(file.path()).await.unwrap();
        let doc = SchemaExtractor::new(source, config())
            .unwrap()
            .extract(PROJECT)
            .await
            .unwrap();

        assert_eq!(doc.item_types.names(), vec!["Risk"]);
        assert_eq!(doc.version.name.as_deref(), Some("1.0"));
        let severity = &doc.item_types.get("Risk").unwrap().fields["Severity"];
        assert_eq!(severity.domain.enumerated(), ["High"]);
    }
}
