//! Rendering of ranked records.
//!
//! Three views over the same ranked slice: a self-contained HTML document,
//! a JSON export for scripts, and a fixed-width console table. Renderers
//! never touch a record's stored rank; query-local numbering is a
//! [`RenderOptions::renumber`] concern.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::config::ReportConfig;
use crate::models::Record;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub title: String,
    /// Number rows 1..N within this view instead of showing global ranks.
    pub renumber: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&ReportConfig::default())
    }
}

impl From<&ReportConfig> for RenderOptions {
    fn from(config: &ReportConfig) -> Self {
        Self {
            title: config.title.clone(),
            renumber: config.renumber,
        }
    }
}

impl RenderOptions {
    fn number(&self, position: usize, record: &Record) -> usize {
        if self.renumber {
            position + 1
        } else {
            record.rank()
        }
    }
}

pub fn render_html(records: &[Record], opts: &RenderOptions) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    out.push_str("    <meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "    <title>{}</title>", escape_html(&opts.title));
    out.push_str("</head>\n<body>\n    <table border=\"1\">\n        <tr>\n");
    for heading in [
        "Номер",
        "Название",
        "Цена",
        "Фасовка",
        "Файл",
        "Цена за кг.",
    ] {
        let _ = writeln!(out, "            <th>{}</th>", heading);
    }
    out.push_str("        </tr>\n");

    for (i, record) in records.iter().enumerate() {
        out.push_str("        <tr>\n");
        let _ = writeln!(out, "            <td>{}</td>", opts.number(i, record));
        let _ = writeln!(out, "            <td>{}</td>", escape_html(record.product()));
        let _ = writeln!(out, "            <td>{}</td>", record.price());
        let _ = writeln!(out, "            <td>{}</td>", record.weight());
        let _ = writeln!(out, "            <td>{}</td>", escape_html(record.source_file()));
        let _ = writeln!(out, "            <td>{:.2}</td>", record.unit_price());
        out.push_str("        </tr>\n");
    }

    out.push_str("    </table>\n</body>\n</html>\n");
    out
}

/// Write the HTML report, creating parent directories as needed.
pub fn write_html(path: &Path, records: &[Record], opts: &RenderOptions) -> Result<()> {
    write_output(path, &render_html(records, opts))
}

#[derive(Serialize)]
struct ExportData<'a> {
    generated_at: String,
    count: usize,
    records: Vec<ExportRecord<'a>>,
}

#[derive(Serialize)]
struct ExportRecord<'a> {
    number: usize,
    #[serde(flatten)]
    record: &'a Record,
}

/// Pretty-printed JSON export of the given records.
pub fn render_json(records: &[Record], opts: &RenderOptions) -> Result<String> {
    let data = ExportData {
        generated_at: Utc::now().to_rfc3339(),
        count: records.len(),
        records: records
            .iter()
            .enumerate()
            .map(|(i, record)| ExportRecord {
                number: opts.number(i, record),
                record,
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&data)?)
}

pub fn write_json(path: &Path, records: &[Record], opts: &RenderOptions) -> Result<()> {
    write_output(path, &render_json(records, opts)?)
}

/// Fixed-width console table with a header line.
pub fn render_table(records: &[Record], opts: &RenderOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<3} {:<30} {:<10} {:<5} {:<15} {:<10}",
        "№", "Наименование", "Цена", "Вес", "Файл", "Цена за кг."
    );
    for (i, record) in records.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<3} {:<30} {:<10} {:<5} {:<15} {:.2}",
            opts.number(i, record),
            record.product(),
            record.price(),
            record.weight(),
            record.source_file(),
            record.unit_price()
        );
    }
    out
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report: {}", path.display()))
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
