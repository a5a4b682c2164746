// ============================================================
// Layer 3 — RadGraph Report Types
// ============================================================
// A RadGraph file is a JSON array of reports. Each report maps an
// arbitrary key (usually "0") to a content object:
//
//   {
//     "0": {
//       "text": "opacity noted",
//       "entities": {
//         "e1": { "tokens": ["opacity"], "label": "...",
//                 "start_ix": 0, "end_ix": 0, "relations": [] }
//       },
//       "relations": {
//         "r1": { "type": "located_at", "source": "e1", "target": "e2" }
//       }
//     }
//   }
//
// Reports and entity maps are kept as serde_json::Map so the key
// order of the source file is preserved (preserve_order feature).
// Entities are deserialised into a typed struct on demand.
//
// Reference: RadGraph (Jain et al., 2021)
//            serde documentation (custom deserialize_with)

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One report: arbitrary key → content object.
pub type Report = Map<String, Value>;

/// A single annotated entity inside a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// The words covered by the entity. RadGraph files store either
    /// a list or a single string; both become a Vec here.
    #[serde(deserialize_with = "one_or_many")]
    pub tokens: Vec<String>,

    /// Entity type, e.g. "Observation::definitely present"
    pub label: String,

    /// First word index (inclusive) into the whitespace-split text
    pub start_ix: i64,

    /// Last word index (inclusive)
    pub end_ix: i64,

    /// Entity-level relations, carried through untouched
    #[serde(default = "empty_relations")]
    pub relations: Value,
}

/// A report-level relation between two entities. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    #[serde(rename = "type", default)]
    pub kind:   Option<String>,
    #[serde(default, deserialize_with = "entity_id")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "entity_id")]
    pub target: Option<String>,
}

fn empty_relations() -> Value {
    Value::Array(Vec::new())
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s)  => vec![s],
        OneOrMany::Many(v) => v,
    })
}

/// Entity ids are strings in RadGraph but occasionally bare numbers.
fn entity_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Null      => None,
        other            => Some(other.to_string()),
    })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_from_token_list() {
        let e: Entity = serde_json::from_value(json!({
            "tokens": ["pleural", "effusion"],
            "label": "Observation::definitely present",
            "start_ix": 3,
            "end_ix": 4,
            "relations": [["located_at", "2"]]
        }))
        .unwrap();
        assert_eq!(e.tokens, vec!["pleural", "effusion"]);
        assert_eq!(e.end_ix - e.start_ix, 1);
    }

    #[test]
    fn test_entity_from_bare_token_string() {
        let e: Entity = serde_json::from_value(json!({
            "tokens": "lungs",
            "label": "Anatomy::definitely present",
            "start_ix": 1,
            "end_ix": 1
        }))
        .unwrap();
        assert_eq!(e.tokens, vec!["lungs"]);
        assert_eq!(e.relations, json!([]));
    }

    #[test]
    fn test_relation_type_field() {
        let r: Relation = serde_json::from_value(json!({
            "type": "modify", "source": "e1", "target": 2
        }))
        .unwrap();
        assert_eq!(r.kind.as_deref(), Some("modify"));
        assert_eq!(r.source.as_deref(), Some("e1"));
        assert_eq!(r.target.as_deref(), Some("2"));
    }

    #[test]
    fn test_relation_missing_fields() {
        let r: Relation = serde_json::from_value(json!({"source": "e1"})).unwrap();
        assert_eq!(r.kind, None);
        assert_eq!(r.target, None);
    }
}
