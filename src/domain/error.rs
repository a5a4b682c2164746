// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Every failure the pipeline can hit, as one typed enum.
//
// The data and infra layers return PrepResult<T> so callers can
// match on the variant (the Inspector does, to print a friendly
// message). The application and CLI layers wrap these in anyhow
// with extra context.
//
// Reference: thiserror crate documentation
//            Rust Book §9 (Recoverable Errors with Result)

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrepError {
    /// The input path does not exist
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// A whole-file JSON document could not be parsed
    #[error("invalid JSON in '{}': {source}", path.display())]
    Decode {
        path:   PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// One line of a JSONL file could not be parsed
    #[error("invalid JSON on line {line} of '{}': {source}", path.display())]
    DecodeLine {
        path:   PathBuf,
        line:   usize,
        #[source]
        source: serde_json::Error,
    },

    /// A report content object or flat record lacks a required key
    #[error("record '{key}' is missing required field '{field}'")]
    MissingField { key: String, field: &'static str },

    /// An entity value does not have the expected shape
    #[error("entity '{entity}' in record '{key}' is malformed: {source}")]
    InvalidEntity {
        key:    String,
        entity: String,
        #[source]
        source: serde_json::Error,
    },

    /// The sampler cannot produce the requested split
    #[error("cannot split dataset: {0}")]
    Sampler(String),

    /// Tokenizer loading or encoding failed
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    /// A column produced fewer or more rows than the dataset holds
    #[error("column '{column}' has {actual} rows, expected {expected}")]
    ColumnLength {
        column:   &'static str,
        expected: usize,
        actual:   usize,
    },

    /// Any other filesystem failure
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type PrepResult<T> = std::result::Result<T, PrepError>;

impl PrepError {
    /// Classify an I/O error, promoting NotFound to its own variant.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        if source.kind() == std::io::ErrorKind::NotFound {
            PrepError::FileNotFound(path)
        } else {
            PrepError::Io { path, source }
        }
    }

    pub fn tokenizer(err: impl std::fmt::Display) -> Self {
        PrepError::Tokenizer(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_promoted() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(PrepError::io("x.json", err), PrepError::FileNotFound(_)));
    }

    #[test]
    fn test_other_io_errors_keep_source() {
        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        match PrepError::io("x.json", err) {
            PrepError::Io { path, .. } => assert_eq!(path, PathBuf::from("x.json")),
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
