//! CSV input boundary.
//!
//! The core never opens files; this collaborator turns a retail CSV export
//! into the loosely-typed rows `InteractionStore` validates. Field-level
//! cleanup stays out of here on purpose.

use crate::error::{PipelineError, Result};
use crate::models::RawRow;
use std::path::Path;
use tracing::warn;

/// Reads raw rows from a headered CSV file.
///
/// Rows the CSV layer cannot deserialize at all are skipped with a warning;
/// semantically invalid rows are left for ingestion to drop.
pub fn load_rows<P: AsRef<Path>>(path: P) -> Result<Vec<RawRow>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(|e| PipelineError::Io(format!("{}: {}", path.display(), e)))?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for record in reader.deserialize::<RawRow>() {
        match record {
            Ok(row) => rows.push(row),
            Err(_) => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(
            "Skipped {} malformed CSV records in {}",
            skipped,
            path.display()
        );
    }

    Ok(rows)
}
