// ============================================================
// Layer 4 — RadGraph Dataset
// ============================================================
// An in-memory columnar dataset, one row per FlatRecord.
//
//   column          type              present
//   ──────────────  ────────────────  ─────────────────────────
//   text            String            always
//   labels          Vec<Entity>       always
//   input_ids       Vec<u32>          after tokenisation
//   attention_mask  Vec<u32>          after tokenisation
//
// Columns are stored side by side; a row is assembled on demand
// by Dataset::get. RadDataset implements Burn's Dataset trait so
// any Burn DataLoader can consume it directly.
//
// Reference: Burn Book §4 (Datasets)

use std::path::Path;

use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::data::loader::RadGraphLoader;
use crate::data::normalizer::flatten_reports;
use crate::data::tokenize::TokenBatch;
use crate::domain::error::{PrepError, PrepResult};
use crate::domain::record::FlatRecord;
use crate::domain::report::Entity;
use crate::domain::traits::ReportSource;

/// One row of the dataset as it is written to and read from JSONL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRow {
    pub text:   String,
    pub labels: Vec<Entity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_ids: Option<Vec<u32>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attention_mask: Option<Vec<u32>>,
}

impl From<FlatRecord> for DatasetRow {
    fn from(r: FlatRecord) -> Self {
        Self {
            text:           r.text,
            labels:         r.labels,
            input_ids:      None,
            attention_mask: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RadDataset {
    text:   Vec<String>,
    labels: Vec<Vec<Entity>>,
    tokens: Option<TokenBatch>,
}

impl RadDataset {
    pub fn from_records(records: Vec<FlatRecord>) -> Self {
        let (text, labels) = records.into_iter().map(|r| (r.text, r.labels)).unzip();
        Self { text, labels, tokens: None }
    }

    /// Rebuild a dataset from rows. Token columns are kept only if
    /// every row carries them.
    pub fn from_rows(rows: Vec<DatasetRow>) -> Self {
        let tokenized = !rows.is_empty()
            && rows.iter().all(|r| r.input_ids.is_some() && r.attention_mask.is_some());

        let mut ds     = Self::default();
        let mut tokens = TokenBatch::default();

        for row in rows {
            ds.text.push(row.text);
            ds.labels.push(row.labels);
            if tokenized {
                tokens.input_ids.push(row.input_ids.unwrap_or_default());
                tokens.attention_mask.push(row.attention_mask.unwrap_or_default());
            }
        }

        if tokenized {
            ds.tokens = Some(tokens);
        }
        ds
    }

    /// Attach token columns. Fails if they don't line up with the rows.
    pub fn with_tokens(mut self, tokens: TokenBatch) -> PrepResult<Self> {
        check_len("input_ids", self.text.len(), tokens.input_ids.len())?;
        check_len("attention_mask", self.text.len(), tokens.attention_mask.len())?;
        self.tokens = Some(tokens);
        Ok(self)
    }

    pub fn texts(&self) -> &[String] {
        &self.text
    }

    pub fn is_tokenized(&self) -> bool {
        self.tokens.is_some()
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        let mut cols = vec!["text", "labels"];
        if self.is_tokenized() {
            cols.extend(["input_ids", "attention_mask"]);
        }
        cols
    }

    /// All rows, in order.
    pub fn rows(&self) -> Vec<DatasetRow> {
        (0..self.len()).filter_map(|i| self.get(i)).collect()
    }
}

fn check_len(column: &'static str, expected: usize, actual: usize) -> PrepResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(PrepError::ColumnLength { column, expected, actual })
    }
}

impl Dataset<DatasetRow> for RadDataset {
    fn get(&self, index: usize) -> Option<DatasetRow> {
        let text   = self.text.get(index)?.clone();
        let labels = self.labels.get(index)?.clone();
        let (input_ids, attention_mask) = match &self.tokens {
            Some(t) => (
                t.input_ids.get(index).cloned(),
                t.attention_mask.get(index).cloned(),
            ),
            None => (None, None),
        };

        Some(DatasetRow { text, labels, input_ids, attention_mask })
    }

    fn len(&self) -> usize {
        self.text.len()
    }
}

/// Load and flatten RadGraph JSON files into a dataset with the
/// `text` and `labels` columns.
pub fn prepare_dataset<P: AsRef<Path>>(files: &[P]) -> PrepResult<RadDataset> {
    let loader  = RadGraphLoader::new(files.iter().map(|p| p.as_ref().to_path_buf()));
    let reports = loader.load_all()?;
    let records = flatten_reports(&reports)?;

    tracing::info!("Prepared dataset with {} rows", records.len());
    Ok(RadDataset::from_records(records))
}
