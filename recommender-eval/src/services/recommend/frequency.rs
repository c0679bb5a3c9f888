use super::Recommender;
use crate::error::Result;
use crate::models::{Interaction, Strategy, UserItemMatrix};
use std::collections::HashMap;

/// Frequency-based proxy strategy, "content-based" in the product's naming.
///
/// No item features are involved: items are ranked once by how many
/// interaction rows mention them (occurrence count, not summed quantity).
/// Per user, items already present in that user's matrix row are filtered
/// out; a shortfall below `k` is returned as-is, never backfilled.
pub struct FrequencyProxyRecommender<'a> {
    matrix: &'a UserItemMatrix,
    ranked: Vec<String>,
}

impl<'a> FrequencyProxyRecommender<'a> {
    pub fn new(interactions: &[Interaction], matrix: &'a UserItemMatrix) -> Self {
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for interaction in interactions {
            *counts.entry(interaction.item_id.as_str()).or_insert(0) += 1;
        }

        let mut entries: Vec<(&str, u64)> = counts.into_iter().collect();
        // Ties by ascending item id so runs stay reproducible.
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        Self {
            matrix,
            ranked: entries.into_iter().map(|(item, _)| item.to_string()).collect(),
        }
    }
}

impl Recommender for FrequencyProxyRecommender<'_> {
    fn strategy(&self) -> Strategy {
        Strategy::ContentFrequency
    }

    fn recommend(&self, user_id: &str, k: usize) -> Result<Vec<String>> {
        let owned = self.matrix.row(user_id);
        let list = self
            .ranked
            .iter()
            .filter(|item| owned.map_or(true, |row| !row.contains(item.as_str())))
            .take(k)
            .cloned()
            .collect();
        Ok(list)
    }
}
