// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Resolves a tokenizer name to a loaded tokenizers::Tokenizer.
//
// Resolution order:
//   1. an existing tokenizer.json file path  → load it
//   2. an existing directory                → load <dir>/tokenizer.json
//   3. anything else is a Hugging Face Hub repo id, e.g.
//      "distilbert-base-uncased"; tokenizer.json is fetched with
//      hf-hub's sync API (which keeps its own on-disk cache)
//
// Each call loads afresh; nothing is cached in-process.
//
// Reference: hf-hub crate documentation (api::sync)
//            tokenizers crate documentation (Tokenizer::from_file)

use std::path::{Path, PathBuf};

use tokenizers::Tokenizer;

use crate::domain::error::{PrepError, PrepResult};

/// Tokenizer used when the caller does not name one
pub const DEFAULT_MODEL: &str = "distilbert-base-uncased";

const TOKENIZER_FILE: &str = "tokenizer.json";

#[derive(Debug, Clone, Default)]
pub struct TokenizerStore {
    /// Overrides hf-hub's default cache directory when set
    cache_dir: Option<PathBuf>,
}

impl TokenizerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache_dir(dir: impl Into<PathBuf>) -> Self {
        Self { cache_dir: Some(dir.into()) }
    }

    /// Load the tokenizer named by `model_name`.
    pub fn load(&self, model_name: &str) -> PrepResult<Tokenizer> {
        let path = self.resolve(model_name)?;
        tracing::info!("Loading tokenizer '{}' from '{}'", model_name, path.display());

        Tokenizer::from_file(&path).map_err(|e| {
            PrepError::Tokenizer(format!(
                "cannot load tokenizer from '{}': {e}",
                path.display()
            ))
        })
    }

    /// Find the tokenizer.json for `model_name`, downloading if needed.
    fn resolve(&self, model_name: &str) -> PrepResult<PathBuf> {
        let local = Path::new(model_name);
        if local.is_file() {
            return Ok(local.to_path_buf());
        }
        if local.is_dir() {
            let file = local.join(TOKENIZER_FILE);
            return if file.is_file() {
                Ok(file)
            } else {
                Err(PrepError::FileNotFound(file))
            };
        }

        tracing::info!("Fetching '{}' for '{}' from the Hugging Face Hub", TOKENIZER_FILE, model_name);
        let mut builder = hf_hub::api::sync::ApiBuilder::new();
        if let Some(dir) = &self.cache_dir {
            builder = builder.with_cache_dir(dir.clone());
        }
        let api = builder.build().map_err(PrepError::tokenizer)?;

        api.model(model_name.to_string())
            .get(TOKENIZER_FILE)
            .map_err(|e| PrepError::Tokenizer(format!("cannot fetch tokenizer '{model_name}': {e}")))
    }
}
