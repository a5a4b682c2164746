// ============================================================
// Layer 2 — SplitUseCase
// ============================================================
// Splits the flattened dataset into train / val / test:
//
//   Step 1: Ensure the JSONL input exists    (export from the saved
//                                             dataset if it doesn't)
//   Step 2: Load the JSONL records
//   Step 3: Count labels, collect rare-class records
//   Step 4: Drop rare records from the working set
//   Step 5: Decide on stratification (key = number of labels)
//   Step 6: train / temp  = 80 / 20   (stratified if enabled)
//   Step 7: val / test    = 50 / 50   (never stratified)
//   Step 8: Append every rare record to test
//   Step 9: Write train.jsonl, val.jsonl, test.jsonl, label_counts.csv
//
// Nothing is written to the output directory until every split
// has succeeded.
//
// Rare records end up in test only; nothing is duplicated, so
// train + val + test always adds up to the input size.
//
// An existing input file is used as-is, even if the saved dataset
// has changed since it was exported.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::label_stats::{count_labels, label_count, partition_rare, RARE_LABEL};
use crate::data::loader::{load_jsonl, write_jsonl};
use crate::data::splitter::{train_test_split, DEFAULT_SEED};
use crate::infra::{dataset_store::DatasetStore, metrics::LabelCountLogger};

// ─── Split Configuration ─────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Flattened JSONL input
    pub input_file:   String,
    /// Where train/val/test.jsonl are written
    pub output_dir:   String,
    /// Saved dataset used to create `input_file` when it is missing
    pub dataset_dir:  String,
    pub stratify:     bool,
    pub rare_label:   String,
    pub seed:         u64,
    /// Fraction of the non-rare records held out from train
    pub holdout_size: f64,
    /// Fraction of the held-out records that go to test
    pub test_size:    f64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            input_file:   "data/processed/radgraph.jsonl".to_string(),
            output_dir:   "data/splits".to_string(),
            dataset_dir:  "data/processed".to_string(),
            stratify:     false,
            rare_label:   RARE_LABEL.to_string(),
            seed:         DEFAULT_SEED,
            holdout_size: 0.2,
            test_size:    0.5,
        }
    }
}

/// Sizes of what was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitSummary {
    pub train:      usize,
    pub val:        usize,
    pub test:       usize,
    pub rare:       usize,
    pub stratified: bool,
}

pub struct SplitUseCase {
    config: SplitConfig,
}

impl SplitUseCase {
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<SplitSummary> {
        let cfg        = &self.config;
        let input      = Path::new(&cfg.input_file);
        let output_dir = PathBuf::from(&cfg.output_dir);

        // ── Step 1: Ensure the input exists ───────────────────────────────────
        self.ensure_input(input)?;

        // ── Step 2: Load ──────────────────────────────────────────────────────
        let reports: Vec<Value> = load_jsonl(input)
            .with_context(|| format!("Cannot load records from '{}'", input.display()))?;
        tracing::info!("Loaded {} records from '{}'", reports.len(), input.display());

        // ── Step 3: Count labels ──────────────────────────────────────────────
        let counts = count_labels(&reports)?;
        if counts.is_empty() {
            tracing::warn!("No entity labels found in '{}'", input.display());
        }
        tracing::info!("Class Counts (Entity Types):");
        for (label, count) in counts.iter() {
            tracing::info!("{}: {}", label, count);
        }
        tracing::info!("{} label occurrences across {} classes", counts.total(), counts.len());

        // ── Step 4: Filter out the rare class ─────────────────────────────────
        let (reports, rare_reports) = partition_rare(reports, &cfg.rare_label)?;

        // ── Step 5: Stratify only if feasible ─────────────────────────────────
        let mut stratify_keys: Option<Vec<usize>> = None;
        if cfg.stratify {
            let keys: Vec<usize> = reports.iter().map(label_count).collect();
            if keys.iter().min().map_or(true, |&m| m < 2) {
                tracing::warn!("Some classes have fewer than 2 samples. Stratification disabled.");
            } else {
                stratify_keys = Some(keys);
            }
        }
        let stratified = stratify_keys.is_some();

        // ── Step 6 + 7: Two-stage split ───────────────────────────────────────
        let (train, temp) =
            train_test_split(reports, cfg.holdout_size, stratify_keys.as_deref(), cfg.seed)
                .context("Failed to split off the held-out set")?;
        let (val, mut test) = train_test_split(temp, cfg.test_size, None::<&[usize]>, cfg.seed)
            .context("Failed to split held-out set into val/test")?;

        // ── Step 8: Rare records go to test ───────────────────────────────────
        let rare = rare_reports.len();
        test.extend(rare_reports);
        tracing::info!("Rare class reports added to test set: {}", rare);

        // ── Step 9: Save ──────────────────────────────────────────────────────
        for (name, rows) in [("train", &train), ("val", &val), ("test", &test)] {
            let path = output_dir.join(format!("{name}.jsonl"));
            write_jsonl(&path, rows)
                .with_context(|| format!("Cannot write {name} split"))?;
            tracing::info!("{} split saved to {}", name, path.display());
        }

        let logger = LabelCountLogger::new(&output_dir)?;
        logger.write(&counts)?;
        tracing::info!("Label counts saved to {}", logger.csv_path().display());

        let summary = SplitSummary {
            train: train.len(),
            val:   val.len(),
            test:  test.len(),
            rare,
            stratified,
        };
        tracing::info!("Train: {}, Val: {}, Test: {}", summary.train, summary.val, summary.test);
        Ok(summary)
    }

    fn ensure_input(&self, input: &Path) -> Result<()> {
        if input.exists() {
            tracing::info!("{} already exists. Skipping creation.", input.display());
            return Ok(());
        }

        tracing::info!("{} does not exist. Creating it...", input.display());
        let store = DatasetStore::new(&self.config.dataset_dir);
        let rows  = store.export_jsonl(input).with_context(|| {
            format!(
                "Cannot create '{}' from dataset '{}'. Have you run 'preprocess' first?",
                input.display(),
                self.config.dataset_dir
            )
        })?;
        tracing::info!("Dataset saved as JSONL to '{}' ({} rows)", input.display(), rows);
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::RadDataset;
    use crate::domain::{record::FlatRecord, report::Entity};
    use serde_json::json;
    use std::fs;

    fn entity(label: &str) -> Entity {
        Entity {
            tokens:    vec!["w".into()],
            label:     label.into(),
            start_ix:  0,
            end_ix:    0,
            relations: json!([]),
        }
    }

    fn record(text: &str, labels: &[&str]) -> FlatRecord {
        FlatRecord::new(text, labels.iter().map(|l| entity(l)).collect())
    }

    fn corpus() -> Vec<FlatRecord> {
        let mut records: Vec<FlatRecord> = (0..20)
            .map(|i| record(&format!("report {i}"), &["OBS", "ANAT"][..(i % 2) + 1]))
            .collect();
        records.push(record("rare one", &["ANAT", RARE_LABEL]));
        records.push(record("rare two", &[RARE_LABEL, RARE_LABEL]));
        records
    }

    fn write_corpus(path: &Path, records: &[FlatRecord]) {
        write_jsonl(path, records).unwrap();
    }

    fn read_texts(path: &Path) -> Vec<String> {
        load_jsonl::<Value>(path)
            .unwrap()
            .into_iter()
            .map(|v| v["text"].as_str().unwrap().to_string())
            .collect()
    }

    fn config(dir: &Path) -> SplitConfig {
        SplitConfig {
            input_file:  dir.join("radgraph.jsonl").display().to_string(),
            output_dir:  dir.join("splits").display().to_string(),
            dataset_dir: dir.join("processed").display().to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_split_sizes_add_up_and_rare_in_test_only() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());
        write_corpus(Path::new(&cfg.input_file), &corpus());

        let summary = SplitUseCase::new(cfg.clone()).execute().unwrap();
        assert_eq!(summary.train + summary.val + summary.test, 22);
        assert_eq!(summary, SplitSummary { train: 16, val: 2, test: 4, rare: 2, stratified: false });

        let out   = Path::new(&cfg.output_dir);
        let train = read_texts(&out.join("train.jsonl"));
        let val   = read_texts(&out.join("val.jsonl"));
        let test  = read_texts(&out.join("test.jsonl"));

        for rare in ["rare one", "rare two"] {
            assert!(test.iter().any(|t| t == rare));
            assert!(!train.iter().any(|t| t == rare));
            assert!(!val.iter().any(|t| t == rare));
        }
        assert!(out.join("label_counts.csv").exists());
    }

    #[test]
    fn test_split_is_reproducible() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());
        write_corpus(Path::new(&cfg.input_file), &corpus());

        SplitUseCase::new(cfg.clone()).execute().unwrap();
        let first = read_texts(&Path::new(&cfg.output_dir).join("train.jsonl"));
        SplitUseCase::new(cfg.clone()).execute().unwrap();
        let second = read_texts(&Path::new(&cfg.output_dir).join("train.jsonl"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_stratify_disabled_when_min_key_below_two() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = SplitConfig { stratify: true, ..config(dir.path()) };
        // corpus() contains records with a single label
        write_corpus(Path::new(&cfg.input_file), &corpus());

        let summary = SplitUseCase::new(cfg).execute().unwrap();
        assert!(!summary.stratified);
        assert_eq!(summary.train + summary.val + summary.test, 22);
    }

    #[test]
    fn test_stratify_enabled_when_feasible() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = SplitConfig { stratify: true, ..config(dir.path()) };
        let records: Vec<FlatRecord> = (0..20)
            .map(|i| {
                let labels: &[&str] = if i % 2 == 0 { &["A", "B"] } else { &["A", "B", "C"] };
                record(&format!("r{i}"), labels)
            })
            .collect();
        write_corpus(Path::new(&cfg.input_file), &records);

        let summary = SplitUseCase::new(cfg).execute().unwrap();
        assert!(summary.stratified);
        assert_eq!((summary.train, summary.val, summary.test), (16, 2, 2));
    }

    #[test]
    fn test_missing_input_is_created_from_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());
        DatasetStore::new(&cfg.dataset_dir)
            .save(&RadDataset::from_records(corpus()), &[], None)
            .unwrap();

        let summary = SplitUseCase::new(cfg.clone()).execute().unwrap();
        assert!(Path::new(&cfg.input_file).exists());
        assert_eq!(summary.rare, 2);
    }

    #[test]
    fn test_existing_input_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());
        write_corpus(Path::new(&cfg.input_file), &corpus());
        DatasetStore::new(&cfg.dataset_dir)
            .save(&RadDataset::from_records(vec![record("other", &["X"])]), &[], None)
            .unwrap();

        let summary = SplitUseCase::new(cfg).execute().unwrap();
        assert_eq!(summary.train + summary.val + summary.test, 22);
    }

    #[test]
    fn test_malformed_line_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());
        fs::write(&cfg.input_file, "{\"text\": \"a\", \"labels\": []}\n{broken\n").unwrap();
        assert!(SplitUseCase::new(cfg).execute().is_err());
    }

    #[test]
    fn test_only_rare_records_fails_to_split() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());
        write_corpus(Path::new(&cfg.input_file), &[record("r", &[RARE_LABEL])]);
        assert!(SplitUseCase::new(cfg).execute().is_err());
    }

    #[test]
    fn test_failed_split_leaves_no_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());
        write_corpus(
            Path::new(&cfg.input_file),
            &[record("r1", &[RARE_LABEL]), record("r2", &["OBS", RARE_LABEL])],
        );

        assert!(SplitUseCase::new(cfg.clone()).execute().is_err());
        assert!(!Path::new(&cfg.output_dir).exists());
    }

    #[test]
    fn test_label_counts_written_with_splits() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());
        write_corpus(Path::new(&cfg.input_file), &corpus());
        SplitUseCase::new(cfg.clone()).execute().unwrap();

        let csv = fs::read_to_string(Path::new(&cfg.output_dir).join("label_counts.csv")).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("label,count"));
        assert_eq!(lines.next(), Some("OBS,20"));
        assert_eq!(lines.next(), Some("ANAT,11"));
        assert_eq!(lines.next(), Some(&*format!("{RARE_LABEL},3")));
    }
}
