// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by more than one workflow:
//
//   tokenizer_store.rs — resolves a tokenizer name to a loaded
//                        tokenizers::Tokenizer (local file, local
//                        directory, or Hugging Face Hub download)
//
//   dataset_store.rs   — saves/loads a RadDataset as a directory
//                        (data.jsonl + dataset_info.json) and
//                        exports it as flat JSONL for the splitter
//
//   metrics.rs         — writes per-label occurrence counts of a
//                        split run to label_counts.csv
//
// Reference: Rust Book §7 (Modules)

/// Tokenizer loading
pub mod tokenizer_store;

/// Dataset directory persistence
pub mod dataset_store;

/// Label count CSV writer
pub mod metrics;
