//! # Price Machine
//!
//! Compare supplier price lists by price per kilogram.
//!
//! Price Machine scans a directory for supplier price files (delimited text
//! whose name contains `price`), maps each file's own column names onto a
//! canonical product / price / weight schema, merges every row into one
//! catalog ranked by price per kilogram, and lets the operator search it by
//! product name.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ price_*.csv │──▶│ HeaderResolver│──▶│ RecordIngester│
//! └─────────────┘   └──────────────┘   └──────┬───────┘
//!                                             ▼
//!                                   ┌──────────────────┐
//!                                   │ CatalogAggregator │
//!                                   │ sort + rank 1..N  │
//!                                   └────────┬─────────┘
//!                          ┌─────────────────┼──────────────┐
//!                          ▼                 ▼              ▼
//!                     ┌─────────┐      ┌──────────┐   ┌──────────┐
//!                     │ search  │      │   HTML   │   │   JSON   │
//!                     │ (repl)  │      │  report  │   │  export  │
//!                     └─────────┘      └──────────┘   └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! pm load ./prices              # summary of what was ingested
//! pm search "молоко" ./prices   # ranked matches
//! pm repl ./prices              # interactive search, HTML report on exit
//! pm export ./prices --output report.html
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Records and column mappings |
//! | [`headers`] | Header synonym resolution |
//! | [`ingest`] | Per-file row parsing |
//! | [`catalog`] | Discovery, merge, ranking, search |
//! | [`report`] | HTML, JSON, and console rendering |
//! | [`repl`] | Interactive query loop |
//! | [`sources`] | Candidate file report |
//! | [`progress`] | Load progress on stderr |
//! | [`error`] | Per-file and per-row error types |

pub mod catalog;
pub mod config;
pub mod error;
pub mod headers;
pub mod ingest;
pub mod models;
pub mod progress;
pub mod repl;
pub mod report;
pub mod sources;

pub use catalog::{CatalogAggregator, LoadSummary};
pub use headers::HeaderResolver;
pub use models::{ColumnMapping, ColumnRole, Record};
