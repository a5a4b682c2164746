// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits that define what the
// pipeline works on:
//
//   report — raw RadGraph reports, entities and relations
//   record — the flattened {text, labels} unit
//   error  — the typed error taxonomy shared by every layer
//   traits — seams between the application and data/infra layers
//
// No file I/O and no tokenizer code lives here.
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

pub mod report;

pub mod record;

pub mod error;

pub mod traits;
