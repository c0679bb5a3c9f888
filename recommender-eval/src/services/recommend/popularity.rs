use super::Recommender;
use crate::error::Result;
use crate::models::{Strategy, UserItemMatrix};
use std::collections::HashMap;

/// Global popularity baseline.
///
/// Ranks the whole catalog by total aggregated quantity across all users,
/// descending, ties broken by ascending item id. The list is precomputed
/// once and every user receives the same top-k, owned items included.
pub struct PopularityRecommender {
    ranked: Vec<String>,
}

impl PopularityRecommender {
    pub fn new(matrix: &UserItemMatrix) -> Self {
        let mut totals: HashMap<&str, u64> = HashMap::new();
        for (_, row) in matrix.iter() {
            for (item, qty) in row.quantities() {
                *totals.entry(item.as_str()).or_insert(0) += *qty;
            }
        }

        let mut entries: Vec<(&str, u64)> = totals.into_iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        Self {
            ranked: entries.into_iter().map(|(item, _)| item.to_string()).collect(),
        }
    }

    /// The full catalog ranking, most popular first.
    pub fn ranked(&self) -> &[String] {
        &self.ranked
    }
}

impl Recommender for PopularityRecommender {
    fn strategy(&self) -> Strategy {
        Strategy::Popularity
    }

    fn recommend(&self, _user_id: &str, k: usize) -> Result<Vec<String>> {
        Ok(self.ranked.iter().take(k).cloned().collect())
    }
}
