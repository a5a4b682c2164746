// ============================================================
// Layer 6 — Dataset Store
// ============================================================
// Saves and restores a RadDataset as a directory on disk.
//
// Layout:
//   data/processed/
//     data.jsonl          ← one DatasetRow per line
//     dataset_info.json   ← row count, columns, provenance
//
// dataset_info.json is written after data.jsonl, so a directory
// with an info file always has complete rows next to it.
//
// export_jsonl() writes the rows to a standalone JSONL file; the
// splitter uses it to materialise its input from a saved dataset.
//
// Reference: Rust Book §9 (Error Handling)
//            serde_json documentation

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::data::dataset::{DatasetRow, RadDataset};
use crate::data::loader::{load_json, load_jsonl, write_jsonl};
use crate::domain::error::{PrepError, PrepResult};

const DATA_FILE: &str = "data.jsonl";
const INFO_FILE: &str = "dataset_info.json";

/// Metadata written next to the rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub num_rows:     usize,
    pub columns:      Vec<String>,
    #[serde(default)]
    pub source_files: Vec<String>,
    #[serde(default)]
    pub tokenizer:    Option<String>,
}

/// Manages a dataset directory.
pub struct DatasetStore {
    dir: PathBuf,
}

impl DatasetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Save `dataset` with provenance, replacing any previous contents.
    pub fn save(
        &self,
        dataset:      &RadDataset,
        source_files: &[String],
        tokenizer:    Option<&str>,
    ) -> PrepResult<DatasetInfo> {
        fs::create_dir_all(&self.dir).map_err(|e| PrepError::io(&self.dir, e))?;

        let rows = dataset.rows();
        write_jsonl(self.dir.join(DATA_FILE), &rows)?;

        let info = DatasetInfo {
            num_rows:     rows.len(),
            columns:      dataset.column_names().into_iter().map(String::from).collect(),
            source_files: source_files.to_vec(),
            tokenizer:    tokenizer.map(String::from),
        };

        let info_path = self.dir.join(INFO_FILE);
        let json = serde_json::to_string_pretty(&info).map_err(|e| PrepError::Io {
            path:   info_path.clone(),
            source: e.into(),
        })?;
        fs::write(&info_path, json).map_err(|e| PrepError::io(&info_path, e))?;

        tracing::debug!("Saved {} rows to '{}'", info.num_rows, self.dir.display());
        Ok(info)
    }

    /// Load the dataset saved in this directory.
    pub fn load(&self) -> PrepResult<RadDataset> {
        let rows: Vec<DatasetRow> = load_jsonl(self.dir.join(DATA_FILE))?;
        let info = self.info()?;

        if info.num_rows != rows.len() {
            return Err(PrepError::ColumnLength {
                column:   "text",
                expected: info.num_rows,
                actual:   rows.len(),
            });
        }

        Ok(RadDataset::from_rows(rows))
    }

    pub fn info(&self) -> PrepResult<DatasetInfo> {
        load_json(self.dir.join(INFO_FILE))
    }

    /// Write the saved dataset's rows as flattened JSONL to `path`.
    pub fn export_jsonl(&self, path: impl AsRef<Path>) -> PrepResult<usize> {
        let dataset = self.load()?;
        let rows    = dataset.rows();
        write_jsonl(path.as_ref(), &rows)?;
        Ok(rows.len())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tokenize::TokenBatch;
    use crate::domain::record::FlatRecord;
    use burn::data::dataset::Dataset;

    fn dataset() -> RadDataset {
        RadDataset::from_records(vec![
            FlatRecord::new("opacity noted", vec![]),
            FlatRecord::new("lungs clear", vec![]),
        ])
    }

    #[test]
    fn test_save_then_load() {
        let dir   = tempfile::tempdir().unwrap();
        let store = DatasetStore::new(dir.path().join("processed"));

        let info = store
            .save(&dataset(), &["data/raw/section_findings.json".to_string()], None)
            .unwrap();
        assert_eq!(info.num_rows, 2);
        assert_eq!(info.columns, vec!["text", "labels"]);

        let loaded = store.load().unwrap();
        assert_eq!(loaded.rows(), dataset().rows());
        assert_eq!(store.info().unwrap(), info);
    }

    #[test]
    fn test_tokenized_columns_survive() {
        let dir   = tempfile::tempdir().unwrap();
        let store = DatasetStore::new(dir.path());
        let ds    = dataset()
            .with_tokens(TokenBatch {
                input_ids:      vec![vec![1, 2], vec![3]],
                attention_mask: vec![vec![1, 1], vec![1]],
            })
            .unwrap();

        let info = store.save(&ds, &[], Some("tokenizer.json")).unwrap();
        assert_eq!(info.tokenizer.as_deref(), Some("tokenizer.json"));

        let loaded = store.load().unwrap();
        assert!(loaded.is_tokenized());
        assert_eq!(loaded.get(1).unwrap().input_ids, Some(vec![3]));
    }

    #[test]
    fn test_export_jsonl() {
        let dir   = tempfile::tempdir().unwrap();
        let store = DatasetStore::new(dir.path().join("processed"));
        store.save(&dataset(), &[], None).unwrap();

        let out = dir.path().join("flat/radgraph.jsonl");
        assert_eq!(store.export_jsonl(&out).unwrap(), 2);

        let raw = fs::read_to_string(&out).unwrap();
        assert_eq!(raw.lines().count(), 2);
        assert!(raw.lines().next().unwrap().contains("\"opacity noted\""));
    }

    #[test]
    fn test_load_missing_dir_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = DatasetStore::new(dir.path().join("nope")).load().unwrap_err();
        assert!(matches!(err, PrepError::FileNotFound(_)));
    }
}
