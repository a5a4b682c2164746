// ============================================================
// Layer 6 — Label Count Report
// ============================================================
// Writes the per-label occurrence counts of a split run to a CSV
// file next to the split outputs, for plotting class balance.
//
// Output file: <output_dir>/label_counts.csv
//
//   label,count
//   Anatomy::definitely present,1520
//   Observation::definitely present,1133
//   Observation::measurement::definitely absent,3
//
// Rows keep the first-seen order of the labels. The file is
// rewritten on every run.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::data::label_stats::LabelCounts;
use crate::domain::error::{PrepError, PrepResult};

const CSV_FILE: &str = "label_counts.csv";

pub struct LabelCountLogger {
    csv_path: PathBuf,
}

impl LabelCountLogger {
    /// Create the output directory if needed.
    pub fn new(dir: impl AsRef<Path>) -> PrepResult<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| PrepError::io(dir, e))?;
        Ok(Self { csv_path: dir.join(CSV_FILE) })
    }

    pub fn write(&self, counts: &LabelCounts) -> PrepResult<()> {
        let path = &self.csv_path;
        let file = File::create(path).map_err(|e| PrepError::io(path, e))?;
        let mut f = BufWriter::new(file);

        writeln!(f, "label,count").map_err(|e| PrepError::io(path, e))?;
        for (label, count) in counts.iter() {
            writeln!(f, "{},{}", csv_field(label), count).map_err(|e| PrepError::io(path, e))?;
        }
        f.flush().map_err(|e| PrepError::io(path, e))?;

        tracing::debug!("Wrote {} label counts to '{}'", counts.len(), path.display());
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

/// Quote a CSV field if it contains a separator, quote or newline.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
