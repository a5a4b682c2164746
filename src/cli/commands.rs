// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands and their flags. Defaults match
// the standard project layout (data/raw, data/processed, ...),
// so every command runs without arguments.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::{
    inspect_use_case::InspectConfig,
    preprocess_use_case::PreprocessConfig,
    split_use_case::SplitConfig,
};
use crate::data::label_stats::RARE_LABEL;
use crate::data::splitter::DEFAULT_SEED;
use crate::data::tokenize::DEFAULT_BATCH_SIZE;
use crate::infra::tokenizer_store::DEFAULT_MODEL;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Flatten raw RadGraph JSON files into a processed dataset
    Preprocess(PreprocessArgs),

    /// Split the flattened dataset into train/val/test JSONL files
    Split(SplitArgs),

    /// Write human-readable samples of the raw annotation files
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
pub struct PreprocessArgs {
    /// Raw RadGraph JSON file; repeat for several files
    #[arg(
        long = "input-file",
        default_values_t = [
            "data/raw/section_findings.json".to_string(),
            "data/raw/section_impression.json".to_string(),
        ]
    )]
    pub input_files: Vec<String>,

    /// Directory to save the processed dataset in
    #[arg(long, default_value = "data/processed")]
    pub output_dir: String,

    /// Also tokenize: a tokenizer.json path, a directory holding one,
    /// or a Hugging Face Hub model id. A bare `--tokenizer` uses
    /// distilbert-base-uncased.
    #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_MODEL)]
    pub tokenizer: Option<String>,

    /// Number of texts encoded per tokenizer call
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Cache directory for tokenizers downloaded from the Hub
    #[arg(long)]
    pub cache_dir: Option<String>,
}

impl From<PreprocessArgs> for PreprocessConfig {
    fn from(a: PreprocessArgs) -> Self {
        PreprocessConfig {
            input_files: a.input_files,
            output_dir:  a.output_dir,
            tokenizer:   a.tokenizer,
            batch_size:  a.batch_size,
            cache_dir:   a.cache_dir,
        }
    }
}

#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Flattened JSONL input; created from --dataset-dir if missing
    #[arg(long, default_value = "data/processed/radgraph.jsonl")]
    pub input_file: String,

    /// Directory where train/val/test.jsonl are saved
    #[arg(long, default_value = "data/splits")]
    pub output_dir: String,

    /// Processed dataset directory written by `preprocess`
    #[arg(long, default_value = "data/processed")]
    pub dataset_dir: String,

    /// Stratify the train/held-out split by number of labels per report
    #[arg(long)]
    pub stratify: bool,

    /// Label whose reports are all placed in the test split
    #[arg(long, default_value = RARE_LABEL)]
    pub rare_label: String,

    /// Random seed for both split stages
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

impl From<SplitArgs> for SplitConfig {
    fn from(a: SplitArgs) -> Self {
        SplitConfig {
            input_file:  a.input_file,
            output_dir:  a.output_dir,
            dataset_dir: a.dataset_dir,
            stratify:    a.stratify,
            rare_label:  a.rare_label,
            seed:        a.seed,
            ..SplitConfig::default()
        }
    }
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    #[arg(long, default_value = "data/raw/section_findings.json")]
    pub findings_file: String,

    #[arg(long, default_value = "data/raw/section_impression.json")]
    pub impression_file: String,

    /// Text file the samples are written to (overwritten)
    #[arg(long, default_value = "radgraph_samples.txt")]
    pub output_path: String,

    /// Reports rendered per section
    #[arg(long, default_value_t = 2)]
    pub num_samples: usize,
}

impl From<InspectArgs> for InspectConfig {
    fn from(a: InspectArgs) -> Self {
        InspectConfig {
            findings_file:   a.findings_file,
            impression_file: a.impression_file,
            output_path:     a.output_path,
            num_samples:     a.num_samples,
        }
    }
}
