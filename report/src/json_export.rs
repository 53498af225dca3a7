//! JSON export functionality

use anyhow::{Context, Result};
use loadstats_core::RunStatistics;
use serde_json::json;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes run statistics as pretty-printed JSON
pub struct JsonExporter;

impl JsonExporter {
    /// Export the full statistics, including every response time
    pub fn export(stats: &RunStatistics, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        write_pretty(file, stats).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Export summary only (smaller file)
    pub fn export_summary(stats: &RunStatistics, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let output = json!({
            "started_at": stats.started_at(),
            "total_duration_secs": stats.total_duration().as_secs_f64(),
            "total_requests": stats.total_requests(),
            "failure_count": stats.failure_count(),
            "average_response_time": stats.average_response_time(),
        });

        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        write_pretty(file, &output).with_context(|| format!("Failed to write {}", path.display()))
    }
}

fn write_pretty<T: serde::Serialize + ?Sized>(file: File, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}
