//! Tab-aligned terminal tables

use anyhow::Result;
use loadstats_core::{FailureRecord, RunStatistics};
use std::io::Write;

/// Longest response body shown per failure row
const BODY_PREVIEW_CHARS: usize = 80;

/// Column-aligned table with a header row
///
/// Columns are padded to the widest cell, in the spirit of a tab writer.
#[derive(Debug, Clone, Default)]
pub struct SummaryTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl SummaryTable {
    /// Table with the given column titles
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; missing cells render empty, extra cells are dropped
    pub fn push_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = row.into_iter().map(Into::into).collect();
        row.resize(self.header.len(), String::new());
        self.rows.push(row);
    }

    /// Write the table, one line per row
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        let widths: Vec<usize> = (0..self.header.len())
            .map(|col| {
                std::iter::once(&self.header)
                    .chain(self.rows.iter())
                    .map(|row| row[col].chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        for row in std::iter::once(&self.header).chain(self.rows.iter()) {
            let line = row
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join("  ");
            writeln!(out, "{}", line.trim_end())?;
        }

        Ok(())
    }
}

/// Print the average response time and failure count
pub fn print_summary<W: Write>(stats: &RunStatistics, out: &mut W) -> Result<()> {
    let mut table = SummaryTable::new(["AVG Response Time", "Total Calls in error", "Total Calls"]);
    table.push_row([
        format!("{:.6}", stats.average_response_time()),
        stats.failure_count().to_string(),
        stats.total_requests().to_string(),
    ]);

    writeln!(out)?;
    table.write_to(out)
}

/// Print one row per failed call
///
/// Does nothing when the run had no failures.
pub fn print_failures<W: Write>(stats: &RunStatistics, out: &mut W) -> Result<()> {
    if stats.failure_log().is_empty() {
        return Ok(());
    }

    let mut table = SummaryTable::new(["Status", "URL", "Response"]);
    for failure in stats.failure_log() {
        table.push_row(failure_row(failure));
    }

    writeln!(out)?;
    table.write_to(out)
}

fn failure_row(failure: &FailureRecord) -> [String; 3] {
    let status = match failure.status_code {
        Some(code) => code.to_string(),
        None => "ERR".to_string(),
    };
    [status, failure.url.clone(), preview(&failure.response_body)]
}

fn preview(body: &str) -> String {
    let flat = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= BODY_PREVIEW_CHARS {
        flat
    } else {
        let cut: String = flat.chars().take(BODY_PREVIEW_CHARS).collect();
        format!("{cut}...")
    }
}
