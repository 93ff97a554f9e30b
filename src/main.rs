//! # Price Machine CLI (`pm`)
//!
//! The `pm` binary loads a directory of supplier price lists, ranks every
//! product by price per kilogram, and lets the operator search the result
//! or export it as an HTML or JSON report.
//!
//! ## Usage
//!
//! ```bash
//! pm [--config ./config/pm.toml] <command> [DIR]
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `pm load` | Load the directory and print an ingestion summary |
//! | `pm search "<query>"` | Print records whose product name contains the query |
//! | `pm export` | Write the ranked catalog as HTML or JSON |
//! | `pm repl` | Interactive search; writes the HTML report on exit |
//! | `pm sources` | List candidate price files and their resolved columns |
//!
//! `DIR` defaults to `[catalog].directory` from the config, or `.`.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use price_machine::catalog::{CatalogAggregator, LoadSummary};
use price_machine::config::{self, Config};
use price_machine::progress::ProgressMode;
use price_machine::report::{self, RenderOptions};
use price_machine::{repl, sources};

/// Price Machine: rank supplier price lists by price per kilogram.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. Without it, `./config/pm.toml` is used when present and built-in
/// defaults otherwise.
#[derive(Parser)]
#[command(
    name = "pm",
    about = "Price Machine: rank supplier price lists by price per kilogram",
    version,
    long_about = "Price Machine scans a directory for supplier price files, maps their \
    differently named columns onto product, price, and weight, ranks every row by price per \
    kilogram, and offers substring search plus HTML and JSON reports."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Increase log verbosity (`-v` info, `-vv` debug). `RUST_LOG` overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Progress output on stderr. Defaults to `human` on a TTY, else `off`.
    #[arg(long, global = true, value_enum)]
    progress: Option<ProgressMode>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Load price files and print what was ingested.
    Load {
        /// Directory holding the price files.
        dir: Option<PathBuf>,

        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Search loaded records by product name (case-insensitive substring).
    Search {
        /// Text to look for in product names.
        query: String,

        /// Directory holding the price files.
        dir: Option<PathBuf>,

        /// Number results 1..N instead of showing catalog ranks.
        #[arg(long)]
        renumber: bool,

        /// Maximum number of results to print.
        #[arg(long)]
        limit: Option<usize>,

        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Export the ranked catalog.
    Export {
        /// Directory holding the price files.
        dir: Option<PathBuf>,

        /// Output file. Defaults to `[report].output`.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format.
        #[arg(long, value_enum, default_value = "html")]
        format: ExportFormat,

        /// Number rows 1..N in the report instead of showing catalog ranks.
        #[arg(long)]
        renumber: bool,
    },

    /// Interactive search. Type `exit` to quit; the HTML report is written on exit.
    Repl {
        /// Directory holding the price files.
        dir: Option<PathBuf>,

        /// Report file written on exit. Defaults to `[report].output`.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Skip writing the report on exit.
        #[arg(long)]
        no_export: bool,

        /// Show catalog ranks instead of numbering each result list from 1.
        #[arg(long)]
        global_ranks: bool,
    },

    /// List candidate price files and the columns resolved from their headers.
    Sources {
        /// Directory holding the price files.
        dir: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Html,
    Json,
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "price_machine=warn,pm=warn",
        1 => "price_machine=info,pm=info",
        _ => "price_machine=debug,pm=debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = config::load_config_or_default(&cli.config)?;
    let progress = cli.progress.unwrap_or_else(ProgressMode::default_for_tty);

    match cli.command {
        Commands::Load { dir, json } => {
            let (_, summary) = load_catalog(&cfg, dir.as_deref(), progress)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
        }
        Commands::Search {
            query,
            dir,
            renumber,
            limit,
            json,
        } => {
            let (catalog, _) = load_catalog(&cfg, dir.as_deref(), progress)?;
            let mut results = catalog.search(&query);
            if let Some(limit) = limit {
                results.truncate(limit);
            }
            let opts = RenderOptions {
                renumber: renumber || cfg.report.renumber,
                ..RenderOptions::from(&cfg.report)
            };
            if json {
                println!("{}", report::render_json(&results, &opts)?);
            } else if results.is_empty() {
                println!("{}", repl::NOT_FOUND);
            } else {
                print!("{}", report::render_table(&results, &opts));
            }
        }
        Commands::Export {
            dir,
            output,
            format,
            renumber,
        } => {
            let (catalog, _) = load_catalog(&cfg, dir.as_deref(), progress)?;
            let opts = RenderOptions {
                renumber: renumber || cfg.report.renumber,
                ..RenderOptions::from(&cfg.report)
            };
            let path = output.unwrap_or_else(|| cfg.report.output.clone());
            match format {
                ExportFormat::Html => report::write_html(&path, catalog.records(), &opts)?,
                ExportFormat::Json => report::write_json(&path, catalog.records(), &opts)?,
            }
            eprintln!(
                "Exported {} records to {}",
                catalog.len(),
                path.display()
            );
        }
        Commands::Repl {
            dir,
            output,
            no_export,
            global_ranks,
        } => {
            let (catalog, _) = load_catalog(&cfg, dir.as_deref(), progress)?;
            let opts = RenderOptions {
                renumber: !global_ranks,
                ..RenderOptions::from(&cfg.report)
            };
            let stdin = io::stdin();
            repl::run_repl(&catalog, stdin.lock(), io::stdout().lock(), &opts)?;

            if !no_export {
                let path = output.unwrap_or_else(|| cfg.report.output.clone());
                report::write_html(&path, catalog.records(), &RenderOptions::from(&cfg.report))?;
                info!(path = %path.display(), "report written");
            }
        }
        Commands::Sources { dir } => {
            let dir = dir.unwrap_or_else(|| cfg.catalog.directory.clone());
            sources::list_sources(&cfg, &dir)?;
        }
    }

    Ok(())
}

fn load_catalog(
    cfg: &Config,
    dir: Option<&Path>,
    progress: ProgressMode,
) -> Result<(CatalogAggregator, LoadSummary)> {
    let dir = dir.unwrap_or(cfg.catalog.directory.as_path());
    let reporter = progress.reporter();
    let mut catalog = CatalogAggregator::new(cfg);
    let summary = catalog.load_with_progress(dir, &*reporter)?;
    Ok((catalog, summary))
}

fn print_summary(summary: &LoadSummary) {
    println!("load");
    println!("  files matched: {}", summary.files_matched);
    println!("  files ingested: {}", summary.files_ingested);
    for (file, missing) in &summary.files_missing_columns {
        println!("  skipped {}: missing {}", file, missing.join(", "));
    }
    for (file, reason) in &summary.files_failed {
        println!("  failed {}: {}", file, reason);
    }
    println!("  rows skipped: {}", summary.rows_skipped);
    println!("  records: {}", summary.records);
    println!("ok");
}
