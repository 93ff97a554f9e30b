//! Price-list ingestion.
//!
//! Reads one delimited text file, resolves its header row through the
//! [`HeaderResolver`], and turns each data row into a [`Record`]. Malformed
//! rows are skipped and reported; a file missing any canonical column
//! contributes nothing.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, warn};

use crate::error::{IngestError, RowError};
use crate::headers::HeaderResolver;
use crate::models::{ColumnMapping, ColumnRole, Record, ResolvedColumns};

/// Outcome of ingesting a single file.
#[derive(Debug, Clone)]
pub struct FileIngest {
    pub source_file: String,
    pub mapping: ColumnMapping,
    pub records: Vec<Record>,
    pub skipped: Vec<RowError>,
}

impl FileIngest {
    /// Whether every canonical column was found in the header row.
    pub fn is_complete(&self) -> bool {
        self.mapping.complete().is_some()
    }
}

/// Ingest the file at `path`, tagging records with its file name.
///
/// The file handle is released on every return path, including when a row
/// fails part-way through the file.
pub fn ingest_file(
    path: &Path,
    resolver: &HeaderResolver,
    delimiter: u8,
) -> Result<FileIngest, IngestError> {
    let source_file = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    ingest_reader(file, &source_file, resolver, delimiter).map_err(|source| {
        IngestError::Read {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Ingest delimited text from any reader.
///
/// Returns `Err` only when the header row or the underlying stream cannot
/// be read; per-row problems end up in [`FileIngest::skipped`].
pub fn ingest_reader<R: Read>(
    reader: R,
    source_file: &str,
    resolver: &HeaderResolver,
    delimiter: u8,
) -> Result<FileIngest, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);

    let mapping = resolver.resolve(rdr.headers()?.iter());
    let mut ingest = FileIngest {
        source_file: source_file.to_string(),
        mapping,
        records: Vec::new(),
        skipped: Vec::new(),
    };

    let Some(columns) = mapping.complete() else {
        debug!(
            file = source_file,
            missing = ?mapping.missing(),
            "price file lacks required columns, skipping"
        );
        return Ok(ingest);
    };

    for result in rdr.records() {
        let row = match result {
            Ok(row) => row,
            Err(err) if err.is_io_error() => return Err(err),
            Err(err) => {
                let line = err.position().map(|p| p.line()).unwrap_or(0);
                let err = RowError::Csv {
                    line,
                    message: err.to_string(),
                };
                warn!(file = source_file, "skipping row: {}", err);
                ingest.skipped.push(err);
                continue;
            }
        };

        match parse_row(&row, columns, source_file) {
            Ok(record) => ingest.records.push(record),
            Err(err) => {
                warn!(file = source_file, "skipping row: {}", err);
                ingest.skipped.push(err);
            }
        }
    }

    debug!(
        file = source_file,
        records = ingest.records.len(),
        skipped = ingest.skipped.len(),
        "ingested price file"
    );

    Ok(ingest)
}

fn parse_row(
    row: &StringRecord,
    columns: ResolvedColumns,
    source_file: &str,
) -> Result<Record, RowError> {
    let line = row.position().map(|p| p.line()).unwrap_or(0);
    let product = field(row, columns.product, ColumnRole::Product, line)?;
    let price = parse_amount(
        field(row, columns.price, ColumnRole::Price, line)?,
        ColumnRole::Price,
        line,
    )?;
    let weight = parse_amount(
        field(row, columns.weight, ColumnRole::Weight, line)?,
        ColumnRole::Weight,
        line,
    )?;
    Ok(Record::new(product, price, weight, source_file))
}

fn field(row: &StringRecord, column: usize, role: ColumnRole, line: u64) -> Result<&str, RowError> {
    row.get(column)
        .ok_or(RowError::MissingField { line, role, column })
}

/// Parse a non-negative decimal with a `.` separator.
fn parse_amount(value: &str, role: ColumnRole, line: u64) -> Result<f64, RowError> {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Ok(n),
        _ => Err(RowError::InvalidNumber {
            line,
            role,
            value: value.to_string(),
        }),
    }
}
