//! The merged, ranked price catalog.
//!
//! [`CatalogAggregator`] owns the full load pipeline: discover price files
//! in a directory, ingest each one, merge all rows, sort by price per
//! kilogram, and assign ranks. It also answers substring searches over the
//! ranked collection.
//!
//! ```text
//! directory ──▶ discover_files ──▶ ingest_file (per file) ──▶ scratch Vec
//!                                                                 │
//!                                       stable sort + rank 1..N ◀─┘
//!                                                 │
//!                                                 ▼
//!                                      published records ──▶ search
//! ```
//!
//! A load builds into a scratch collection and swaps it in only after the
//! sort and ranking step, so readers never observe a half-built catalog.
//! Each aggregator owns its records; several can coexist.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::{CatalogConfig, Config};
use crate::headers::HeaderResolver;
use crate::ingest::ingest_file;
use crate::models::{ColumnRole, Record};
use crate::progress::{LoadProgressEvent, LoadProgressReporter, NoProgress};

/// What happened during the last [`CatalogAggregator::load`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadSummary {
    /// Files whose name matched the price-file rule.
    pub files_matched: usize,
    /// Files that had every canonical column.
    pub files_ingested: usize,
    /// Files skipped for lacking a canonical column, with the missing roles.
    pub files_missing_columns: Vec<(String, Vec<String>)>,
    /// Files that could not be opened or read, with the reason.
    pub files_failed: Vec<(String, String)>,
    /// Data rows skipped because a field was missing or malformed.
    pub rows_skipped: usize,
    /// Records in the published catalog.
    pub records: usize,
}

pub struct CatalogAggregator {
    resolver: HeaderResolver,
    settings: CatalogConfig,
    records: Vec<Record>,
}

impl CatalogAggregator {
    pub fn new(config: &Config) -> Self {
        Self::with_resolver(
            HeaderResolver::with_extra(&config.synonyms),
            config.catalog.clone(),
        )
    }

    pub fn with_resolver(resolver: HeaderResolver, settings: CatalogConfig) -> Self {
        Self {
            resolver,
            settings,
            records: Vec::new(),
        }
    }

    /// Ranked records from the last load, ascending by price per kilogram.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn load(&mut self, directory: &Path) -> Result<LoadSummary> {
        self.load_with_progress(directory, &NoProgress)
    }

    /// Rebuild the catalog from every price file in `directory`.
    ///
    /// Replaces the previous collection. A missing directory yields an empty
    /// catalog; a directory that exists but cannot be listed is an error and
    /// leaves the previous collection in place. Unreadable files and
    /// malformed rows are skipped and counted in the summary.
    pub fn load_with_progress(
        &mut self,
        directory: &Path,
        progress: &dyn LoadProgressReporter,
    ) -> Result<LoadSummary> {
        progress.report(LoadProgressEvent::Discovering {
            directory: directory.display().to_string(),
        });

        let files = discover_files(directory, &self.settings)?;
        let total = files.len() as u64;
        let delimiter = self.settings.delimiter_byte();

        let mut summary = LoadSummary {
            files_matched: files.len(),
            ..LoadSummary::default()
        };
        let mut scratch: Vec<Record> = Vec::new();

        for (i, path) in files.iter().enumerate() {
            let name = file_name(path);
            progress.report(LoadProgressEvent::Ingesting {
                file: name.clone(),
                n: i as u64 + 1,
                total,
            });

            let ingest = match ingest_file(path, &self.resolver, delimiter) {
                Ok(ingest) => ingest,
                Err(e) => {
                    warn!("skipping price file: {}", e);
                    summary.files_failed.push((name, e.to_string()));
                    continue;
                }
            };

            if !ingest.is_complete() {
                let missing = ingest
                    .mapping
                    .missing()
                    .iter()
                    .map(ColumnRole::to_string)
                    .collect();
                summary.files_missing_columns.push((name, missing));
                continue;
            }

            summary.files_ingested += 1;
            summary.rows_skipped += ingest.skipped.len();
            scratch.extend(ingest.records);
        }

        rank(&mut scratch);
        summary.records = scratch.len();
        self.records = scratch;

        info!(
            directory = %directory.display(),
            files = summary.files_matched,
            records = summary.records,
            rows_skipped = summary.rows_skipped,
            "catalog loaded"
        );
        progress.report(LoadProgressEvent::Done {
            files: summary.files_ingested as u64,
            records: summary.records as u64,
        });

        Ok(summary)
    }

    /// Records whose product name contains `query`, ignoring case.
    ///
    /// Results keep catalog order and their global ranks. An empty query
    /// matches every record.
    pub fn search(&self, query: &str) -> Vec<Record> {
        let needle = query.to_lowercase();
        self.records
            .iter()
            .filter(|r| r.product().to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

/// Stable sort by price per kilogram, then number 1..N.
///
/// Records with equal unit prices keep their append order.
pub fn rank(records: &mut [Record]) {
    records.sort_by(|a, b| {
        a.unit_price()
            .partial_cmp(&b.unit_price())
            .unwrap_or(Ordering::Equal)
    });
    for (i, record) in records.iter_mut().enumerate() {
        record.set_rank(i + 1);
    }
}

/// List price files directly inside `directory`, in listing order.
///
/// A file qualifies when its name contains `name_contains` (ignoring case),
/// ends with `.<extension>`, and matches none of `exclude_globs`.
pub fn discover_files(directory: &Path, settings: &CatalogConfig) -> Result<Vec<PathBuf>> {
    if !directory.exists() {
        debug!(directory = %directory.display(), "price directory does not exist");
        return Ok(Vec::new());
    }
    if !directory.is_dir() {
        bail!("Price directory is not a directory: {}", directory.display());
    }

    let exclude_set = build_globset(&settings.exclude_globs)?;
    let needle = settings.name_contains.to_lowercase();
    let suffix = format!(".{}", settings.extension.trim_start_matches('.').to_lowercase());

    let mut files = Vec::new();
    let walker = WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true);
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(e).with_context(|| {
                    format!("Failed to list price directory: {}", directory.display())
                })
            }
            Err(e) => {
                warn!("skipping directory entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_lowercase();
        if !name.contains(&needle) || !name.ends_with(&suffix) {
            continue;
        }
        if exclude_set.is_match(entry.file_name()) {
            debug!(file = %name, "price file excluded by glob");
            continue;
        }

        files.push(entry.into_path());
    }

    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
