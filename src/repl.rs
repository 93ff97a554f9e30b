//! Interactive search loop.
//!
//! Reads one query per line and prints the matching records until the
//! operator types `exit` or input ends.

use std::io::{BufRead, Write};

use anyhow::Result;

use crate::catalog::CatalogAggregator;
use crate::report::{render_table, RenderOptions};

pub const PROMPT: &str = "Введите текст для поиска (или 'exit' для выхода): ";
pub const EXIT_TOKEN: &str = "exit";
pub const FAREWELL: &str = "Работа завершена.";
pub const NOT_FOUND: &str = "Товары не найдены.";

/// Run the query loop. Returns the number of queries answered.
pub fn run_repl<R: BufRead, W: Write>(
    catalog: &CatalogAggregator,
    mut input: R,
    mut output: W,
    opts: &RenderOptions,
) -> Result<usize> {
    let mut answered = 0;
    let mut line = String::new();

    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            break;
        }

        let query = line.trim();
        if query.eq_ignore_ascii_case(EXIT_TOKEN) {
            writeln!(output, "{}", FAREWELL)?;
            break;
        }
        if query.is_empty() {
            continue;
        }

        let results = catalog.search(query);
        if results.is_empty() {
            writeln!(output, "{}", NOT_FOUND)?;
        } else {
            write!(output, "{}", render_table(&results, opts))?;
        }
        answered += 1;
    }

    Ok(answered)
}
