// ============================================================
// Layer 4 — Record Normalizer
// ============================================================
// Flattens nested RadGraph reports into FlatRecords.
//
//   report { key → content { text, entities { id → entity } } }
//       │
//       ▼
//   FlatRecord { text, labels: [entity, entity, ...] }
//
// One FlatRecord is emitted per (key, content) pair. Entity ids
// are dropped and the entity values are kept in file order.
//
// Failures are fatal:
//   - content without "text" or "entities" → MissingField
//   - entity without tokens/label/offsets  → InvalidEntity
//
// Reference: Rust Book §13 (Iterators)

use serde::Deserialize;
use serde_json::Value;

use crate::domain::error::{PrepError, PrepResult};
use crate::domain::record::FlatRecord;
use crate::domain::report::{Entity, Report};

/// Flatten every report, preserving report order then key order.
pub fn flatten_reports(reports: &[Report]) -> PrepResult<Vec<FlatRecord>> {
    let mut records = Vec::with_capacity(reports.len());

    for report in reports {
        for (key, content) in report {
            records.push(normalize_content(key, content)?);
        }
    }

    tracing::debug!("Normalised {} reports into {} records", reports.len(), records.len());
    Ok(records)
}

/// Convert one content object into a FlatRecord.
pub fn normalize_content(key: &str, content: &Value) -> PrepResult<FlatRecord> {
    let text = content
        .get("text")
        .and_then(Value::as_str)
        .ok_or_else(|| missing(key, "text"))?;

    let entities = content
        .get("entities")
        .and_then(Value::as_object)
        .ok_or_else(|| missing(key, "entities"))?;

    let labels = entities
        .iter()
        .map(|(entity_id, value)| {
            Entity::deserialize(value).map_err(|source| PrepError::InvalidEntity {
                key:    key.to_string(),
                entity: entity_id.clone(),
                source,
            })
        })
        .collect::<PrepResult<Vec<_>>>()?;

    Ok(FlatRecord::new(text, labels))
}

fn missing(key: &str, field: &'static str) -> PrepError {
    PrepError::MissingField { key: key.to_string(), field }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report(v: Value) -> Report {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn test_single_report_single_entity() {
        let r = report(json!({
            "0": {
                "text": "opacity noted",
                "entities": {
                    "e1": {
                        "tokens": ["opacity"],
                        "label": "Observation::definitely present",
                        "start_ix": 0,
                        "end_ix": 0,
                        "relations": {}
                    }
                }
            }
        }));

        let records = flatten_reports(&[r]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "opacity noted");
        assert_eq!(records[0].labels.len(), 1);
        assert_eq!(records[0].labels[0].label, "Observation::definitely present");
        assert_eq!(records[0].labels[0].relations, json!({}));
    }

    #[test]
    fn test_one_record_per_content_entry() {
        let r = report(json!({
            "0": {"text": "a", "entities": {}},
            "1": {"text": "b", "entities": {}}
        }));
        let records = flatten_reports(&[r.clone(), r]).unwrap();
        let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "a", "b"]);
    }

    #[test]
    fn test_entity_order_follows_source() {
        let r = report(json!({
            "0": {
                "text": "left lung clear",
                "entities": {
                    "9": {"tokens": ["clear"], "label": "OBS", "start_ix": 2, "end_ix": 2},
                    "1": {"tokens": ["left"],  "label": "ANAT", "start_ix": 0, "end_ix": 0}
                }
            }
        }));
        let records = flatten_reports(&[r]).unwrap();
        let labels: Vec<&str> = records[0].labels.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["OBS", "ANAT"]);
    }

    #[test]
    fn test_missing_text_is_error() {
        let r   = report(json!({"0": {"entities": {}}}));
        let err = flatten_reports(&[r]).unwrap_err();
        assert!(matches!(err, PrepError::MissingField { field: "text", .. }));
    }

    #[test]
    fn test_missing_entities_is_error() {
        let r   = report(json!({"7": {"text": "no entities here"}}));
        match flatten_reports(&[r]).unwrap_err() {
            PrepError::MissingField { key, field } => {
                assert_eq!(key, "7");
                assert_eq!(field, "entities");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_entity_is_error() {
        let r = report(json!({
            "0": {"text": "x", "entities": {"e1": {"label": "OBS"}}}
        }));
        assert!(matches!(
            flatten_reports(&[r]).unwrap_err(),
            PrepError::InvalidEntity { .. }
        ));
    }
}
