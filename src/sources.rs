//! Price file discovery report.
//!
//! Lists every file a load would pick up, with the columns resolved from
//! its header row. Used by `pm sources` to check why a supplier file
//! contributes nothing before running a full load.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::catalog::discover_files;
use crate::config::Config;
use crate::headers::HeaderResolver;
use crate::ingest::ingest_file;

/// Column mapping and row counts for one candidate file.
#[derive(Debug, Clone, Serialize)]
pub struct SourceStatus {
    pub file: String,
    pub product: Option<usize>,
    pub price: Option<usize>,
    pub weight: Option<usize>,
    /// Whether all three columns were found and the file was readable.
    pub usable: bool,
    pub records: usize,
    pub rows_skipped: usize,
    /// Missing roles or the read error, if any.
    pub notes: Option<String>,
}

pub fn get_sources(config: &Config, directory: &Path) -> Result<Vec<SourceStatus>> {
    let resolver = HeaderResolver::with_extra(&config.synonyms);
    let delimiter = config.catalog.delimiter_byte();
    let mut sources = Vec::new();

    for path in discover_files(directory, &config.catalog)? {
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let status = match ingest_file(&path, &resolver, delimiter) {
            Ok(ingest) => {
                let missing = ingest.mapping.missing();
                SourceStatus {
                    file,
                    product: ingest.mapping.product,
                    price: ingest.mapping.price,
                    weight: ingest.mapping.weight,
                    usable: missing.is_empty(),
                    records: ingest.records.len(),
                    rows_skipped: ingest.skipped.len(),
                    notes: if missing.is_empty() {
                        None
                    } else {
                        let names: Vec<&str> = missing.iter().map(|r| r.as_str()).collect();
                        Some(format!("missing columns: {}", names.join(", ")))
                    },
                }
            }
            Err(e) => SourceStatus {
                file,
                product: None,
                price: None,
                weight: None,
                usable: false,
                records: 0,
                rows_skipped: 0,
                notes: Some(e.to_string()),
            },
        };
        sources.push(status);
    }

    Ok(sources)
}

pub fn list_sources(config: &Config, directory: &Path) -> Result<()> {
    let sources = get_sources(config, directory)?;
    if sources.is_empty() {
        println!("No price files found in {}", directory.display());
        return Ok(());
    }

    println!(
        "{:<24} {:<8} {:<6} {:<6} {:<7} {:<8} NOTES",
        "FILE", "PRODUCT", "PRICE", "WEIGHT", "ROWS", "SKIPPED"
    );
    for s in &sources {
        println!(
            "{:<24} {:<8} {:<6} {:<6} {:<7} {:<8} {}",
            s.file,
            column(s.product),
            column(s.price),
            column(s.weight),
            s.records,
            s.rows_skipped,
            s.notes.as_deref().unwrap_or("")
        );
    }

    Ok(())
}

fn column(index: Option<usize>) -> String {
    index.map(|i| i.to_string()).unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn reports_mapping_per_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::write(
            tmp.path().join("price_a.csv"),
            "код,наименование,цена,вес\n1,Сахар,60,2\n2,Соль,x,1\n",
        )
        .unwrap();
        fs::write(tmp.path().join("price_b.csv"), "товар,розница\nМука,40\n").unwrap();

        let mut sources = get_sources(&Config::default(), tmp.path()).unwrap();
        sources.sort_by(|a, b| a.file.cmp(&b.file));

        let a = &sources[0];
        assert!(a.usable);
        assert_eq!((a.product, a.price, a.weight), (Some(1), Some(2), Some(3)));
        assert_eq!(a.records, 1);
        assert_eq!(a.rows_skipped, 1);

        let b = &sources[1];
        assert!(!b.usable);
        assert_eq!(b.weight, None);
        assert_eq!(b.notes.as_deref(), Some("missing columns: weight"));
    }
}
