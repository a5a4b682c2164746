// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams between the application layer and the concrete
// loaders/stores underneath it.
//
//   ReportSource — anything that yields raw RadGraph reports
//                  (RadGraphLoader reads JSON files from disk)
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use crate::domain::error::PrepResult;
use crate::domain::report::Report;

// ─── ReportSource ─────────────────────────────────────────────────────────────
/// Any component that can load RadGraph reports.
///
/// Implementations:
///   - RadGraphLoader → loads from a list of JSON array files
pub trait ReportSource {
    /// Load every report, in source order.
    fn load_all(&self) -> PrepResult<Vec<Report>>;
}
