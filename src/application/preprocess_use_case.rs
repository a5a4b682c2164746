// ============================================================
// Layer 2 — PreprocessUseCase
// ============================================================
// Builds the processed dataset from raw RadGraph files:
//
//   Step 1: Load + flatten the raw JSON files   (Layer 4 - data)
//   Step 2: Tokenize the text column, if asked  (Layer 4 + 6)
//   Step 3: Save the dataset directory          (Layer 6 - infra)
//
// Any bad file aborts the run before anything is written.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::dataset::prepare_dataset;
use crate::data::tokenize::{prepare_tokenized_dataset, DEFAULT_BATCH_SIZE};
use crate::infra::{
    dataset_store::{DatasetInfo, DatasetStore},
    tokenizer_store::TokenizerStore,
};

// ─── Preprocess Configuration ────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessConfig {
    pub input_files: Vec<String>,
    pub output_dir:  String,
    /// Tokenizer name/path; None keeps only the text and labels columns
    pub tokenizer:   Option<String>,
    pub batch_size:  usize,
    /// hf-hub cache override; None uses the hub default
    pub cache_dir:   Option<String>,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            input_files: vec![
                "data/raw/section_findings.json".to_string(),
                "data/raw/section_impression.json".to_string(),
            ],
            output_dir:  "data/processed".to_string(),
            tokenizer:   None,
            batch_size:  DEFAULT_BATCH_SIZE,
            cache_dir:   None,
        }
    }
}

pub struct PreprocessUseCase {
    config: PreprocessConfig,
}

impl PreprocessUseCase {
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<DatasetInfo> {
        let cfg = &self.config;

        // ── Step 1: Load and flatten ──────────────────────────────────────────
        tracing::info!("Preparing dataset from {} file(s)", cfg.input_files.len());
        let dataset = prepare_dataset(&cfg.input_files)
            .context("Failed to prepare dataset from raw RadGraph files")?;

        // ── Step 2: Optional tokenisation ─────────────────────────────────────
        let dataset = match &cfg.tokenizer {
            Some(name) => {
                let store = match &cfg.cache_dir {
                    Some(dir) => TokenizerStore::with_cache_dir(dir),
                    None      => TokenizerStore::new(),
                };
                prepare_tokenized_dataset(dataset, name, &store, cfg.batch_size)
                    .with_context(|| format!("Failed to tokenize dataset with '{name}'"))?
            }
            None => dataset,
        };

        // ── Step 3: Persist ───────────────────────────────────────────────────
        let store = DatasetStore::new(&cfg.output_dir);
        let info  = store
            .save(&dataset, &cfg.input_files, cfg.tokenizer.as_deref())
            .with_context(|| format!("Cannot save dataset to '{}'", cfg.output_dir))?;

        tracing::info!("Dataset saved to '{}' ({} rows)", cfg.output_dir, info.num_rows);
        Ok(info)
    }
}
