// ============================================================
// Layer 4 — Tokenizer Adapter
// ============================================================
// Converts raw report text into model-ready token id sequences.
//
//   ["opacity noted", ""]
//       │  tokenizer.encode_batch(.., add_special_tokens = true)
//       ▼
//   TokenBatch {
//     input_ids:      [[101, 7, 8, 102], [101, 102]],
//     attention_mask: [[1, 1, 1, 1],     [1, 1]],
//   }
//
// Output always has one entry per input text, in input order.
// No padding or truncation is applied here; sequences keep their
// natural length and batching/padding is left to the consumer.
//
// tokenize_dataset walks a RadDataset in fixed-size batches and
// appends the two columns, never reordering or dropping rows.
//
// Reference: tokenizers crate documentation (Tokenizer::encode_batch)

use serde::{Deserialize, Serialize};
use tokenizers::Tokenizer;

use crate::data::dataset::RadDataset;
use crate::domain::error::{PrepError, PrepResult};
use crate::infra::tokenizer_store::TokenizerStore;

/// Default number of texts encoded per batch
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Token columns for a batch of texts, index-aligned with the input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenBatch {
    pub input_ids:      Vec<Vec<u32>>,
    pub attention_mask: Vec<Vec<u32>>,
}

impl TokenBatch {
    pub fn len(&self) -> usize {
        self.input_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input_ids.is_empty()
    }

    fn extend(&mut self, other: TokenBatch) {
        self.input_ids.extend(other.input_ids);
        self.attention_mask.extend(other.attention_mask);
    }
}

/// Encode `texts` with special tokens. Empty strings are valid.
pub fn tokenize_texts<S: AsRef<str>>(texts: &[S], tokenizer: &Tokenizer) -> PrepResult<TokenBatch> {
    let inputs: Vec<&str> = texts.iter().map(AsRef::as_ref).collect();

    let encodings = tokenizer
        .encode_batch(inputs, true)
        .map_err(PrepError::tokenizer)?;

    if encodings.len() != texts.len() {
        return Err(PrepError::ColumnLength {
            column:   "input_ids",
            expected: texts.len(),
            actual:   encodings.len(),
        });
    }

    let mut batch = TokenBatch::default();
    for enc in encodings {
        batch.input_ids.push(enc.get_ids().to_vec());
        batch.attention_mask.push(enc.get_attention_mask().to_vec());
    }
    Ok(batch)
}

/// Tokenize the `text` column in batches of `batch_size` and attach
/// `input_ids` / `attention_mask` columns.
pub fn tokenize_dataset(
    dataset:    RadDataset,
    tokenizer:  &Tokenizer,
    batch_size: usize,
) -> PrepResult<RadDataset> {
    let batch_size = batch_size.max(1);
    let mut tokens = TokenBatch::default();

    for (i, chunk) in dataset.texts().chunks(batch_size).enumerate() {
        let batch = tokenize_texts(chunk, tokenizer)?;
        tracing::debug!("Tokenized batch {} ({} texts)", i + 1, batch.len());
        tokens.extend(batch);
    }

    if tokens.is_empty() {
        tracing::warn!("Dataset has no rows; token columns will be empty");
    } else {
        tracing::info!("Tokenized {} rows", tokens.len());
    }
    dataset.with_tokens(tokens)
}

/// Resolve `model_name` through `store` and tokenize the dataset with it.
pub fn prepare_tokenized_dataset(
    dataset:    RadDataset,
    model_name: &str,
    store:      &TokenizerStore,
    batch_size: usize,
) -> PrepResult<RadDataset> {
    let tokenizer = store.load(model_name)?;
    tokenize_dataset(dataset, &tokenizer, batch_size)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::FlatRecord;
    use crate::infra::tokenizer_store::testing::word_level_tokenizer;
    use burn::data::dataset::Dataset;

    #[test]
    fn test_tokenize_texts_keeps_length_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let tok = word_level_tokenizer(dir.path(), &["example report text"]);

        let texts  = vec!["Example report text.".to_string(), String::new()];
        let tokens = tokenize_texts(&texts, &tok).unwrap();

        assert_eq!(tokens.input_ids.len(), 2);
        assert_eq!(tokens.attention_mask.len(), 2);
        assert!(!tokens.input_ids[0].is_empty());
        assert!(tokens.input_ids[0].len() > tokens.input_ids[1].len());
    }

    #[test]
    fn test_tokenize_texts_empty_input() {
        let dir    = tempfile::tempdir().unwrap();
        let tok    = word_level_tokenizer(dir.path(), &["anything"]);
        let texts: Vec<String> = Vec::new();
        assert!(tokenize_texts(&texts, &tok).unwrap().is_empty());
    }

    #[test]
    fn test_tokenize_empty_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let tok = word_level_tokenizer(dir.path(), &["unused"]);

        let ds = tokenize_dataset(RadDataset::from_records(Vec::new()), &tok, 8).unwrap();
        assert_eq!(ds.len(), 0);
        assert!(ds.is_tokenized());
    }

    #[test]
    fn test_tokenize_dataset_small_batches_preserve_rows() {
        let dir = tempfile::tempdir().unwrap();
        let tok = word_level_tokenizer(dir.path(), &["lungs clear", "heart normal", "no effusion"]);

        let ds = RadDataset::from_records(vec![
            FlatRecord::new("lungs clear", vec![]),
            FlatRecord::new("heart normal", vec![]),
            FlatRecord::new("", vec![]),
            FlatRecord::new("no effusion", vec![]),
        ]);

        // batch_size 3 forces a second, partial batch
        let one_shot = tokenize_dataset(ds.clone(), &tok, 100).unwrap();
        let batched  = tokenize_dataset(ds, &tok, 3).unwrap();

        assert_eq!(batched.len(), 4);
        assert_eq!(batched.rows(), one_shot.rows());
        assert_eq!(batched.get(2).unwrap().text, "");
        assert_eq!(
            batched.column_names(),
            vec!["text", "labels", "input_ids", "attention_mask"]
        );
    }

    #[test]
    fn test_prepare_tokenized_dataset_from_local_file() {
        let dir  = tempfile::tempdir().unwrap();
        word_level_tokenizer(dir.path(), &["stable"]);
        let path = dir.path().join("tokenizer.json");

        let ds = RadDataset::from_records(vec![FlatRecord::new("stable", vec![])]);
        let store = TokenizerStore::new();
        let ds    = prepare_tokenized_dataset(ds, path.to_str().unwrap(), &store, DEFAULT_BATCH_SIZE)
            .unwrap();
        assert!(ds.is_tokenized());
    }
}
