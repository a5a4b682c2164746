// ============================================================
// Layer 4 — Label Statistics and Rare-Class Carve-Out
// ============================================================
// Works on flattened records as raw JSON objects so that every
// column (including token columns) survives the split untouched.
//
//   count_labels   — total occurrences of each label value across
//                    all labels of all records, first-seen order
//   partition_rare — pull out every record carrying the rare label
//                    (each record once, matched by position)
//   label_count    — number of labels on a record, the stratify key
//
// Reference: Rust Book §8 (Hash Maps)

use std::collections::HashMap;

use serde_json::Value;

use crate::domain::error::{PrepError, PrepResult};

/// The label whose records always go to the test split
pub const RARE_LABEL: &str = "Observation::measurement::definitely absent";

/// Label → occurrence count, in the order labels were first seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelCounts {
    entries: Vec<(String, usize)>,
    index:   HashMap<String, usize>,
}

impl LabelCounts {
    pub fn add(&mut self, label: &str) {
        match self.index.get(label) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(label.to_string(), self.entries.len());
                self.entries.push((label.to_string(), 1));
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(l, c)| (l.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, c)| c).sum()
    }
}

/// The label strings of one record, in order.
pub fn record_labels(record: &Value, position: usize) -> PrepResult<Vec<&str>> {
    let labels = record
        .get("labels")
        .and_then(Value::as_array)
        .ok_or_else(|| PrepError::MissingField {
            key:   format!("line {}", position + 1),
            field: "labels",
        })?;

    labels
        .iter()
        .map(|l| {
            l.get("label").and_then(Value::as_str).ok_or_else(|| PrepError::MissingField {
                key:   format!("line {}", position + 1),
                field: "label",
            })
        })
        .collect()
}

/// Number of labels on a record; used as the stratification key.
pub fn label_count(record: &Value) -> usize {
    record
        .get("labels")
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}

/// Tally every label occurrence across all records.
pub fn count_labels(records: &[Value]) -> PrepResult<LabelCounts> {
    let mut counts = LabelCounts::default();
    for (pos, record) in records.iter().enumerate() {
        for label in record_labels(record, pos)? {
            counts.add(label);
        }
    }
    Ok(counts)
}

/// Split records into (remaining, rare). A record is rare if any of its
/// labels equals `rare_label`. Both sides keep input order.
pub fn partition_rare(records: Vec<Value>, rare_label: &str) -> PrepResult<(Vec<Value>, Vec<Value>)> {
    let flags = records
        .iter()
        .enumerate()
        .map(|(pos, r)| record_labels(r, pos).map(|labels| labels.contains(&rare_label)))
        .collect::<PrepResult<Vec<bool>>>()?;

    let mut remaining = Vec::with_capacity(records.len());
    let mut rare      = Vec::new();
    for (record, is_rare) in records.into_iter().zip(flags) {
        if is_rare {
            rare.push(record);
        } else {
            remaining.push(record);
        }
    }
    Ok((remaining, rare))
}
