//! Error types for price-list ingestion.
//!
//! File-level and row-level failures are recoverable: the catalog records
//! them and moves on. Only a failure to list the scan root escapes `load`.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::ColumnRole;

/// A price file that could not be read at all.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// A data row that was skipped.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RowError {
    #[error("line {line}: {role} value '{value}' is not a non-negative number")]
    InvalidNumber {
        line: u64,
        role: ColumnRole,
        value: String,
    },

    #[error("line {line}: missing {role} field (column {column})")]
    MissingField {
        line: u64,
        role: ColumnRole,
        column: usize,
    },

    #[error("line {line}: {message}")]
    Csv { line: u64, message: String },
}

impl RowError {
    pub fn line(&self) -> u64 {
        match self {
            RowError::InvalidNumber { line, .. }
            | RowError::MissingField { line, .. }
            | RowError::Csv { line, .. } => *line,
        }
    }
}
