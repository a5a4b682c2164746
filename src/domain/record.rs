// ============================================================
// Layer 3 — FlatRecord Domain Type
// ============================================================
// The normalised unit that every downstream step consumes:
//
//   { "text": "...", "labels": [ {tokens, label, start_ix, end_ix, relations}, ... ] }
//
// One FlatRecord is produced per (key, content) pair of a report.
// The entity ids are dropped; only the entity values survive, in
// the order they appear in the source file.
//
// Reference: Rust Book §5 (Structs)

use serde::{Deserialize, Serialize};

use crate::domain::report::Entity;

/// A flattened report ready for tokenisation or splitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRecord {
    pub text:   String,
    pub labels: Vec<Entity>,
}

impl FlatRecord {
    pub fn new(text: impl Into<String>, labels: Vec<Entity>) -> Self {
        Self { text: text.into(), labels }
    }
}
