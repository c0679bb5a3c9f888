use super::{PopularityRecommender, Recommender};
use crate::config::Config;
use crate::error::Result;
use crate::models::{Strategy, UserItemMatrix};
use crate::services::similarity::cosine_similarity;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// User-based k-nearest-neighbor collaborative filtering.
///
/// Cost is bounded two ways: only the first `user_processing_cap` users of
/// the matrix are processed at all, and each processed user is compared
/// against at most `neighbor_sample_cap` other users. A user outside the
/// processed sample receives the popularity list for the same `k`; that
/// fallback is expected behavior, not an error.
pub struct NeighborhoodRecommender<'a> {
    matrix: &'a UserItemMatrix,
    fallback: &'a PopularityRecommender,
    k_neighbors: usize,
    neighbor_sample_cap: usize,
    processed: HashSet<String>,
}

impl<'a> NeighborhoodRecommender<'a> {
    pub fn new(
        matrix: &'a UserItemMatrix,
        fallback: &'a PopularityRecommender,
        config: &Config,
    ) -> Self {
        let processed: HashSet<String> = matrix
            .users()
            .iter()
            .take(config.user_processing_cap)
            .cloned()
            .collect();

        Self {
            matrix,
            fallback,
            k_neighbors: config.k_neighbors,
            neighbor_sample_cap: config.neighbor_sample_cap,
            processed,
        }
    }

    /// Top `k_neighbors` most-similar users with similarity > 0, drawn
    /// from the bounded sample. Non-positive similarities are excluded
    /// entirely.
    fn nearest_neighbors(&self, user_id: &str) -> Vec<(String, f64)> {
        let Some(target_row) = self.matrix.row(user_id) else {
            return Vec::new();
        };

        let mut scored: Vec<(String, f64)> = self
            .matrix
            .users()
            .iter()
            .filter(|other| other.as_str() != user_id)
            .take(self.neighbor_sample_cap)
            .filter_map(|other| {
                let row = self.matrix.row(other)?;
                let sim = cosine_similarity(target_row.quantities(), row.quantities());
                (sim > 0.0).then(|| (other.clone(), sim))
            })
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(self.k_neighbors);
        scored
    }
}

impl Recommender for NeighborhoodRecommender<'_> {
    fn strategy(&self) -> Strategy {
        Strategy::Neighborhood
    }

    fn recommend(&self, user_id: &str, k: usize) -> Result<Vec<String>> {
        if !self.processed.contains(user_id) {
            debug!(
                "Neighborhood CF: user {} outside processing cap, using popularity fallback",
                user_id
            );
            return self.fallback.recommend(user_id, k);
        }

        let neighbors = self.nearest_neighbors(user_id);
        let owned = self.matrix.row(user_id);

        // Candidate score = Σ neighbor quantity × neighbor similarity over
        // items the target user does not already own. BTreeMap keeps the
        // candidate order deterministic before the score sort.
        let mut scores: BTreeMap<String, f64> = BTreeMap::new();
        for (neighbor, sim) in &neighbors {
            let Some(row) = self.matrix.row(neighbor) else {
                continue;
            };
            for item in row.items() {
                if owned.is_some_and(|r| r.contains(item)) {
                    continue;
                }
                let qty = row.quantity(item).unwrap_or(0) as f64;
                *scores.entry(item.clone()).or_insert(0.0) += qty * sim;
            }
        }

        let mut ranked: Vec<(String, f64)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        Ok(ranked.into_iter().take(k).map(|(item, _)| item).collect())
    }
}
