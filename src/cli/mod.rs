// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with clap.
// Business logic lives in Layer 2 (application).
//
// Three commands:
//   1. `preprocess` — raw RadGraph JSON → processed dataset
//   2. `split`      — flattened JSONL   → train/val/test JSONL
//   3. `inspect`    — raw RadGraph JSON → readable sample report
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, InspectArgs, PreprocessArgs, SplitArgs};

#[derive(Parser, Debug)]
#[command(
    name = "radgraph-prep",
    version,
    about = "Prepare RadGraph annotation files for training: flatten, tokenize, split, inspect."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case. This layer only routes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Preprocess(args) => run_preprocess(args),
            Commands::Split(args)      => run_split(args),
            Commands::Inspect(args)    => run_inspect(args),
        }
    }
}

fn run_preprocess(args: PreprocessArgs) -> Result<()> {
    use crate::application::preprocess_use_case::PreprocessUseCase;

    let use_case = PreprocessUseCase::new(args.into());
    let info     = use_case.execute()?;

    println!("Dataset saved ({} rows, columns: {}).", info.num_rows, info.columns.join(", "));
    Ok(())
}

fn run_split(args: SplitArgs) -> Result<()> {
    use crate::application::split_use_case::SplitUseCase;

    let output_dir = args.output_dir.clone();
    let summary    = SplitUseCase::new(args.into()).execute()?;

    println!(
        "Splits saved to {}: train={}, val={}, test={} ({} rare).",
        output_dir, summary.train, summary.val, summary.test, summary.rare
    );
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    use crate::application::inspect_use_case::InspectUseCase;

    InspectUseCase::new(args.into()).execute()?;
    Ok(())
}
