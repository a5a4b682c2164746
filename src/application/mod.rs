// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// One use case per workflow. Each coordinates the data and infra
// layers and owns no parsing or file-format logic itself.
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Raw JSON → processed dataset directory
pub mod preprocess_use_case;

// Flattened JSONL → train / val / test
pub mod split_use_case;

// Raw JSON → human-readable sample report
pub mod inspect_use_case;
