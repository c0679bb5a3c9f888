use crate::error::{PipelineError, Result};
use crate::models::{IngestOutcome, IngestStats, Interaction, RawRow, UserItemMatrix};
use tracing::{debug, info};

/// Validates and aggregates raw rows into the immutable user-item matrix.
///
/// A row survives iff customer id, stock code and description are all
/// non-empty after trimming and the quantity parses to an integer > 0.
/// Invalid rows are dropped silently; there is no partial-row repair.
pub struct InteractionStore;

impl InteractionStore {
    pub fn ingest(rows: &[RawRow]) -> Result<IngestOutcome> {
        let mut interactions: Vec<Interaction> = Vec::new();
        let mut matrix = UserItemMatrix::default();
        let mut dropped = 0usize;

        for row in rows {
            let Some(interaction) = validate(row) else {
                dropped += 1;
                continue;
            };
            matrix.record(
                &interaction.user_id,
                &interaction.item_id,
                interaction.quantity,
            );
            interactions.push(interaction);
        }

        if interactions.is_empty() {
            return Err(PipelineError::DataValidation(format!(
                "no valid interactions in {} input rows",
                rows.len()
            )));
        }

        if dropped > 0 {
            debug!("Ingestion dropped {} invalid rows", dropped);
        }

        let stats = IngestStats {
            users: matrix.user_count(),
            items: matrix.item_count(),
            interactions: interactions.len(),
        };
        info!(
            "Ingested {} interactions: {} users, {} items",
            stats.interactions, stats.users, stats.items
        );

        Ok(IngestOutcome {
            interactions,
            matrix,
            stats,
        })
    }
}

fn validate(row: &RawRow) -> Option<Interaction> {
    let user_id = row.customer_id.trim();
    let item_id = row.stock_code.trim();
    let description = row.description.trim();
    if user_id.is_empty() || item_id.is_empty() || description.is_empty() {
        return None;
    }

    let quantity: u32 = row.quantity.trim().parse().ok().filter(|q| *q > 0)?;

    Some(Interaction {
        user_id: user_id.to_string(),
        item_id: item_id.to_string(),
        quantity,
        timestamp: row.invoice_date.trim().to_string(),
    })
}
