use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};

use crate::report::AnalysisReport;

/// Write the full report as pretty-printed JSON.
pub fn write_json(path: &Path, report: &AnalysisReport) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
