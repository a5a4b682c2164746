// ============================================================
// Layer 2 — InspectUseCase
// ============================================================
// Exploratory look at the raw RadGraph files:
//
//   Step 1: Load findings + impression files, printing the shape
//           of the first entry of each
//   Step 2: Write formatted samples and basic statistics to a
//           text file
//
// Unlike the pipeline commands, loading never fails the run: a
// missing or malformed file is reported on stdout and treated as
// an empty section, so the report is always produced.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::loader::load_json;
use crate::data::report_format::{first_content, save_samples_to_file};
use crate::domain::error::PrepError;
use crate::domain::report::Report;

// ─── Inspect Configuration ───────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectConfig {
    pub findings_file:   String,
    pub impression_file: String,
    pub output_path:     String,
    pub num_samples:     usize,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            findings_file:   "data/raw/section_findings.json".to_string(),
            impression_file: "data/raw/section_impression.json".to_string(),
            output_path:     "radgraph_samples.txt".to_string(),
            num_samples:     2,
        }
    }
}

pub struct InspectUseCase {
    config: InspectConfig,
}

impl InspectUseCase {
    pub fn new(config: InspectConfig) -> Self {
        Self { config }
    }

    /// Returns the number of (findings, impression) reports loaded.
    pub fn execute(&self) -> Result<(usize, usize)> {
        let cfg = &self.config;

        println!("\nLoading Findings section...");
        let findings = load_radgraph_file(&cfg.findings_file);

        println!("\nLoading Impression section...");
        let impression = load_radgraph_file(&cfg.impression_file);

        println!("\nSaving samples to {}...", cfg.output_path);
        save_samples_to_file(&findings, &impression, &cfg.output_path, cfg.num_samples)
            .with_context(|| format!("Cannot write samples to '{}'", cfg.output_path))?;
        println!("Done!");

        Ok((findings.len(), impression.len()))
    }
}

/// Load a RadGraph JSON file, printing its structure. Any failure is
/// printed and yields an empty list.
pub fn load_radgraph_file(path: impl AsRef<Path>) -> Vec<Report> {
    let path = path.as_ref();

    match load_json::<Vec<Report>>(path) {
        Ok(data) => {
            print_structure(path, &data);
            data
        }
        Err(PrepError::FileNotFound(_)) => {
            println!("Error: File not found at {}", path.display());
            Vec::new()
        }
        Err(PrepError::Decode { .. }) => {
            println!("Error: Invalid JSON format in {}", path.display());
            Vec::new()
        }
        Err(e) => {
            println!("Error loading file {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

fn print_structure(path: &Path, data: &[Report]) {
    let Some(first) = data.first().and_then(first_content) else {
        return;
    };

    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    println!("\nFirst entry structure in {name}:");
    println!("Fields available: {:?}", first.keys().collect::<Vec<_>>());

    let text: String = first
        .get("text")
        .and_then(|t| t.as_str())
        .unwrap_or("")
        .chars()
        .take(100)
        .collect();
    println!("\nExample text: {text} ...");

    if let Some(entities) = first.get("entities").and_then(|e| e.as_object()) {
        println!("Number of entities in 1st report: {}", entities.len());
        if let Some(entity) = entities.values().next() {
            println!("Example entity structure: {entity}");
        }
    }
}
