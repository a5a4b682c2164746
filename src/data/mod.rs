// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from raw RadGraph JSON to split-ready records.
//
//   section_*.json
//       │
//       ▼
//   RadGraphLoader    → reads JSON arrays of reports
//       │
//       ▼
//   Normalizer        → flattens reports into {text, labels}
//       │
//       ▼
//   RadDataset        → columnar dataset (Burn Dataset trait)
//       │
//       ▼
//   Tokenizer Adapter → appends input_ids / attention_mask
//       │
//       ▼
//   label_stats       → label counts, rare-class carve-out
//       │
//       ▼
//   Splitter          → seeded (stratified) train/test split
//
// span + report_format render raw reports for inspection.
//
// Reference: Burn Book §4 (Datasets)
//            Rust Book §13 (Iterators and Closures)

/// Reads RadGraph JSON and JSONL files
pub mod loader;

/// Flattens reports into FlatRecords
pub mod normalizer;

/// Columnar in-memory dataset
pub mod dataset;

/// Batched tokenisation of the text column
pub mod tokenize;

/// Label counting and rare-class partitioning
pub mod label_stats;

/// Seeded, optionally stratified, train/test splitting
pub mod splitter;

/// Word-index span reconstruction
pub mod span;

/// Plain-text rendering of report samples
pub mod report_format;
