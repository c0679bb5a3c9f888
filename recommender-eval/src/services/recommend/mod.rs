mod frequency;
mod neighborhood;
mod popularity;

use crate::error::Result;
use crate::models::Strategy;

pub use frequency::FrequencyProxyRecommender;
pub use neighborhood::NeighborhoodRecommender;
pub use popularity::PopularityRecommender;

/// Common ranking contract for all strategies.
///
/// Every implementation returns at most `k` item ids with no duplicates.
/// Strategies are read-only over the matrix and safe to call for users the
/// matrix has never seen.
pub trait Recommender {
    fn strategy(&self) -> Strategy;
    fn recommend(&self, user_id: &str, k: usize) -> Result<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserItemMatrix;

    fn matrix(specs: &[(&str, &[(&str, u32)])]) -> UserItemMatrix {
        let mut matrix = UserItemMatrix::default();
        for (user, items) in specs {
            for (item, qty) in *items {
                matrix.record(user, item, *qty);
            }
        }
        matrix
    }

    #[test]
    fn test_lists_are_bounded_and_duplicate_free() {
        let matrix = matrix(&[
            ("u1", &[("a", 2), ("b", 1), ("c", 4)]),
            ("u2", &[("a", 1), ("d", 3)]),
            ("u3", &[("b", 2), ("c", 1), ("e", 5)]),
        ]);
        let popularity = PopularityRecommender::new(&matrix);

        for k in [0usize, 1, 2, 10] {
            for user in ["u1", "u2", "u3", "stranger"] {
                let list = popularity.recommend(user, k).expect("recommend");
                assert!(list.len() <= k);
                let mut unique = list.clone();
                unique.sort();
                unique.dedup();
                assert_eq!(unique.len(), list.len(), "duplicates for {user}@{k}");
            }
        }
    }
}
