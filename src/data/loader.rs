// ============================================================
// Layer 4 — RadGraph Loader
// ============================================================
// Reads raw RadGraph JSON arrays and JSONL interchange files.
//
// Two on-disk formats are handled here:
//
//   *.json   — one JSON array of reports per file
//              (data/raw/section_findings.json, ...)
//   *.jsonl  — one JSON object per line
//              (flattened records, train/val/test splits)
//
// The loader is strict: a missing file or a malformed document is
// returned as an error, never skipped. A pipeline run that silently
// drops a file would produce a partial dataset.
//
// Blank lines in JSONL are skipped on purpose; they carry no record.
//
// Reference: serde_json documentation
//            Rust Book §9 (Error Handling)

use std::{
    fs::{self, File},
    io::{BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};

use crate::domain::error::{PrepError, PrepResult};
use crate::domain::report::Report;
use crate::domain::traits::ReportSource;

/// Loads every report from an ordered list of RadGraph JSON files.
/// Implements the ReportSource trait from Layer 3.
pub struct RadGraphLoader {
    files: Vec<PathBuf>,
}

impl RadGraphLoader {
    pub fn new<P: Into<PathBuf>>(files: impl IntoIterator<Item = P>) -> Self {
        Self { files: files.into_iter().map(Into::into).collect() }
    }
}

impl ReportSource for RadGraphLoader {
    fn load_all(&self) -> PrepResult<Vec<Report>> {
        let mut reports = Vec::new();

        // File order first, then encounter order inside each file
        for path in &self.files {
            let batch: Vec<Report> = load_json(path)?;
            tracing::debug!("Loaded {} reports from '{}'", batch.len(), path.display());
            reports.extend(batch);
        }

        tracing::info!(
            "Loaded {} reports from {} file(s)",
            reports.len(),
            self.files.len()
        );
        Ok(reports)
    }
}

/// Parse a whole file as one JSON document.
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> PrepResult<T> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| PrepError::io(path, e))?;

    serde_json::from_str(&text).map_err(|source| PrepError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a newline-delimited JSON file, one value per line.
/// Blank lines are skipped; any malformed line aborts the load.
pub fn load_jsonl<T: DeserializeOwned>(path: impl AsRef<Path>) -> PrepResult<Vec<T>> {
    let path   = path.as_ref();
    let file   = File::open(path).map_err(|e| PrepError::io(path, e))?;
    let reader = BufReader::new(file);

    let mut rows = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| PrepError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }

        let row = serde_json::from_str(&line).map_err(|source| PrepError::DecodeLine {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        rows.push(row);
    }

    Ok(rows)
}

/// Write `rows` as newline-delimited JSON, replacing any existing file.
/// Parent directories are created as needed.
pub fn write_jsonl<T: Serialize>(path: impl AsRef<Path>, rows: &[T]) -> PrepResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PrepError::io(parent, e))?;
    }

    let file       = File::create(path).map_err(|e| PrepError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    for row in rows {
        serde_json::to_writer(&mut writer, row).map_err(|e| PrepError::Io {
            path:   path.to_path_buf(),
            source: e.into(),
        })?;
        writer.write_all(b"\n").map_err(|e| PrepError::io(path, e))?;
    }

    writer.flush().map_err(|e| PrepError::io(path, e))
}
