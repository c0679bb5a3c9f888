//! Report output boundary: JSON persistence and a plain-text summary.
//! Charts and richer rendering belong to downstream consumers.

use crate::error::{PipelineError, Result};
use crate::models::ExperimentReport;
use std::fmt::Write as _;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Writes the full report as pretty-printed JSON.
pub fn write_json<P: AsRef<Path>>(report: &ExperimentReport, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .map_err(|e| PipelineError::Io(format!("{}: {}", path.display(), e)))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)
        .map_err(|e| PipelineError::Io(format!("{}: {}", path.display(), e)))?;
    Ok(())
}

/// Fixed-width comparison table for the terminal.
#[must_use]
pub fn render_summary(report: &ExperimentReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Experiment report (k={}, {} users / {} items / {} interactions, {} evaluated users)",
        report.k,
        report.stats.users,
        report.stats.items,
        report.stats.interactions,
        report.evaluated_users
    );
    let _ = writeln!(
        out,
        "{:<20} {:>10} {:>10} {:>10} {:>10} {:>12}",
        "algorithm", "precision", "recall", "ndcg", "coverage", "latency(ms)"
    );
    for record in &report.records {
        let _ = writeln!(
            out,
            "{:<20} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>12}",
            record.algorithm,
            record.precision,
            record.recall,
            record.ndcg,
            record.coverage,
            record.latency_ms
        );
    }
    out
}
