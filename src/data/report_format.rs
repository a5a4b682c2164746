// ============================================================
// Layer 4 — Human-Readable Report Samples
// ============================================================
// Renders raw RadGraph reports as plain text for eyeballing the
// annotations:
//
//   ================================================================================
//   Report #1:
//
//   Text:
//   small left pleural effusion
//
//   Entities:
//
//   - Entity 3:
//     Label: Observation::definitely present
//     Text: pleural effusion
//     Start: 2
//     End: 3
//     Tokens: pleural, effusion
//
//   Relations:
//
//   - Relation r1:
//     Type: located_at
//     Source: 3 (pleural effusion)
//     Target: 1 (left)
//
// Rendering is lenient: missing fields fall back to placeholder
// values instead of failing, since this is a diagnostic view of
// possibly messy input. Output depends only on the inputs.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::data::span::get_text_span;
use crate::domain::error::{PrepError, PrepResult};
use crate::domain::report::{Relation, Report};

const UNKNOWN_ID: &str = "unknown";

/// The content object of a report: key "0" if present, else the first.
pub fn first_content(report: &Report) -> Option<&Map<String, Value>> {
    report
        .get("0")
        .or_else(|| report.values().next())
        .and_then(Value::as_object)
}

/// Render the first `num_samples` reports of `data`.
pub fn format_report_sample(data: &[Report], num_samples: usize) -> String {
    if data.is_empty() {
        return "No data to display".to_string();
    }

    let mut out: Vec<String> = Vec::new();

    for (i, report) in data.iter().take(num_samples).enumerate() {
        let empty   = Map::new();
        let content = first_content(report).unwrap_or(&empty);
        let text    = content.get("text").and_then(Value::as_str).unwrap_or("");

        out.push(format!("\n{}", "=".repeat(80)));
        out.push(format!("Report #{}:", i + 1));

        out.push("\nText:".to_string());
        out.push(text.to_string());

        out.push("\nEntities:".to_string());
        let entities = content.get("entities").and_then(Value::as_object).unwrap_or(&empty);
        if entities.is_empty() {
            out.push("No entities found".to_string());
        } else {
            // Stable sort: equal starts keep their file order
            let mut sorted: Vec<(&String, &Value)> = entities.iter().collect();
            sorted.sort_by_key(|(_, e)| int_field(e, "start_ix", 0));

            for (id, entity) in sorted {
                let start_ix = int_field(entity, "start_ix", -1);
                let end_ix   = int_field(entity, "end_ix", -1);

                out.push(format!("\n- Entity {id}:"));
                out.push(format!("  Label: {}", str_field(entity, "label", "No label")));
                out.push(format!("  Text: {}", get_text_span(text, start_ix, end_ix)));
                out.push(format!("  Start: {start_ix}"));
                out.push(format!("  End: {end_ix}"));

                let tokens = tokens_field(entity);
                if !tokens.is_empty() {
                    out.push(format!("  Tokens: {}", tokens.join(", ")));
                }
            }
        }

        let relations = content.get("relations").and_then(Value::as_object).unwrap_or(&empty);
        if !relations.is_empty() {
            out.push("\nRelations:".to_string());
            for (rel_id, relation) in relations {
                out.push(format!("\n- Relation {rel_id}:"));
                let relation = Relation::deserialize(relation).unwrap_or_default();
                out.push(format!("  Type: {}", relation.kind.as_deref().unwrap_or("No type")));

                let source_id = relation.source.unwrap_or_else(|| UNKNOWN_ID.to_string());
                let target_id = relation.target.unwrap_or_else(|| UNKNOWN_ID.to_string());

                match (entities.get(&source_id), entities.get(&target_id)) {
                    (Some(source), Some(target)) => {
                        out.push(format!("  Source: {source_id} ({})", entity_span(text, source)));
                        out.push(format!("  Target: {target_id} ({})", entity_span(text, target)));
                    }
                    _ => {
                        out.push(format!("  Source: {source_id}"));
                        out.push(format!("  Target: {target_id}"));
                    }
                }
            }
        }
    }

    out.join("\n")
}

/// Write findings/impression samples, corpus sizes and the field layout
/// of the first findings report to `output_path`, replacing the file.
pub fn save_samples_to_file(
    findings:    &[Report],
    impression:  &[Report],
    output_path: impl AsRef<Path>,
    num_samples: usize,
) -> PrepResult<()> {
    let path = output_path.as_ref();
    let mut doc = String::new();

    doc.push_str("\nFINDINGS SECTION SAMPLES:");
    doc.push_str(&format_report_sample(findings, num_samples));

    doc.push_str("\n\nIMPRESSION SECTION SAMPLES:");
    doc.push_str(&format_report_sample(impression, num_samples));

    doc.push_str("\n\nBASIC STATISTICS:");
    doc.push_str(&format!("\nNumber of Finding reports: {}", findings.len()));
    doc.push_str(&format!("\nNumber of Impression reports: {}", impression.len()));

    if let Some(example) = findings.first().and_then(first_content) {
        doc.push_str("\n\nDATA STRUCTURE INFO:");
        doc.push_str(&format!("\nAvailable Fields: {}", sorted_keys(example)));

        let first_entity = example
            .get("entities")
            .and_then(Value::as_object)
            .and_then(|e| e.values().next())
            .and_then(Value::as_object);

        if let Some(entity) = first_entity {
            doc.push_str("\n\nExample Entity Structure:");
            doc.push_str(&format!("\nEntity Fields: {}", sorted_keys(entity)));
        }
    }

    fs::write(path, doc).map_err(|e| PrepError::io(path, e))?;
    tracing::debug!("Wrote report samples to '{}'", path.display());
    Ok(())
}

fn entity_span(text: &str, entity: &Value) -> String {
    get_text_span(text, int_field(entity, "start_ix", -1), int_field(entity, "end_ix", -1))
}

fn sorted_keys(obj: &Map<String, Value>) -> String {
    let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
    keys.sort_unstable();
    keys.join(", ")
}

/// Integer field that may be stored as a number or a numeric string.
fn int_field(v: &Value, key: &str, default: i64) -> i64 {
    match v.get(key) {
        Some(Value::Number(n))  => n.as_i64().unwrap_or(default),
        Some(Value::String(s))  => s.trim().parse().unwrap_or(default),
        _                       => default,
    }
}

fn str_field<'a>(v: &'a Value, key: &str, default: &'a str) -> &'a str {
    v.get(key).and_then(Value::as_str).unwrap_or(default)
}

fn tokens_field(v: &Value) -> Vec<&str> {
    match v.get("tokens") {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.as_str()],
        _ => Vec::new(),
    }
}
