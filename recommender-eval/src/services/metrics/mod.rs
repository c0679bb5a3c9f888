//! Ranking quality metrics for the evaluation pipeline.
//!
//! Per-user scores (precision@k, recall@k, nDCG@k) are always within
//! `[0, 1]`. Aggregation averages over test users with a non-empty true
//! set; users with nothing held out are excluded entirely rather than
//! scored as zero.

use std::collections::{BTreeMap, HashSet};

/// Precision@k: fraction of the top-k slots filled with relevant items.
///
/// The denominator is `k`, not the list length; an empty recommendation
/// list scores 0 rather than being treated as undefined.
#[must_use]
pub fn precision_at_k(recommendations: &[String], true_set: &HashSet<String>, k: usize) -> f64 {
    if recommendations.is_empty() || k == 0 {
        return 0.0;
    }
    let hits = top_k_hits(recommendations, true_set, k);
    hits as f64 / k as f64
}

/// Recall@k: fraction of the true set recovered in the top-k.
///
/// Returns 0 for an empty true set; aggregation must exclude such users
/// before this matters.
#[must_use]
pub fn recall_at_k(recommendations: &[String], true_set: &HashSet<String>, k: usize) -> f64 {
    if true_set.is_empty() {
        return 0.0;
    }
    let hits = top_k_hits(recommendations, true_set, k);
    hits as f64 / true_set.len() as f64
}

/// nDCG@k with binary relevance and a `1 / log2(i + 2)` position discount.
///
/// IDCG assumes the `min(|true_set|, k)` relevant items occupy the first
/// positions. Defined as 0 when IDCG is 0.
#[must_use]
pub fn ndcg_at_k(recommendations: &[String], true_set: &HashSet<String>, k: usize) -> f64 {
    let dcg: f64 = recommendations
        .iter()
        .take(k)
        .enumerate()
        .filter(|(_, item)| true_set.contains(item.as_str()))
        .map(|(i, _)| 1.0 / (i as f64 + 2.0).log2())
        .sum();

    let ideal_hits = std::cmp::min(true_set.len(), k);
    let idcg: f64 = (0..ideal_hits).map(|i| 1.0 / (i as f64 + 2.0).log2()).sum();

    if idcg == 0.0 {
        0.0
    } else {
        dcg / idcg
    }
}

/// Catalog coverage: distinct recommended items across all lists, divided
/// by the distinct item count of the full matrix.
#[must_use]
pub fn coverage<'a, I>(lists: I, catalog_size: usize) -> f64
where
    I: IntoIterator<Item = &'a Vec<String>>,
{
    if catalog_size == 0 {
        return 0.0;
    }
    let recommended: HashSet<&str> = lists
        .into_iter()
        .flat_map(|list| list.iter().map(String::as_str))
        .collect();
    recommended.len() as f64 / catalog_size as f64
}

fn top_k_hits(recommendations: &[String], true_set: &HashSet<String>, k: usize) -> usize {
    recommendations
        .iter()
        .take(k)
        .filter(|item| true_set.contains(item.as_str()))
        .count()
}

/// Aggregate quality for one strategy across all evaluated users.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrategyEvaluation {
    pub precision: f64,
    pub recall: f64,
    pub ndcg: f64,
    pub coverage: f64,
    /// Users that actually entered the averages.
    pub evaluated_users: usize,
}

/// Scores one strategy's per-user lists against the held-out ground truth.
///
/// Quality means run over users with a non-empty true set; coverage runs
/// over every produced list regardless.
#[must_use]
pub fn evaluate_strategy(
    recommendations: &BTreeMap<String, Vec<String>>,
    held_out: &std::collections::HashMap<String, HashSet<String>>,
    k: usize,
    catalog_size: usize,
) -> StrategyEvaluation {
    let mut precision_sum = 0.0;
    let mut recall_sum = 0.0;
    let mut ndcg_sum = 0.0;
    let mut evaluated = 0usize;

    for (user, list) in recommendations {
        let Some(true_set) = held_out.get(user) else {
            continue;
        };
        if true_set.is_empty() {
            continue;
        }
        precision_sum += precision_at_k(list, true_set, k);
        recall_sum += recall_at_k(list, true_set, k);
        ndcg_sum += ndcg_at_k(list, true_set, k);
        evaluated += 1;
    }

    let mean = |sum: f64| if evaluated == 0 { 0.0 } else { sum / evaluated as f64 };

    StrategyEvaluation {
        precision: mean(precision_sum),
        recall: mean(recall_sum),
        ndcg: mean(ndcg_sum),
        coverage: coverage(recommendations.values(), catalog_size),
        evaluated_users: evaluated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_precision_counts_hits_over_k() {
        let recs = list(&["a", "b", "c", "d"]);
        let truth = set(&["b", "d"]);
        assert!((precision_at_k(&recs, &truth, 4) - 0.5).abs() < 1e-9);
        assert!((precision_at_k(&recs, &truth, 2) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_precision_empty_list_is_zero() {
        let truth = set(&["a"]);
        assert_eq!(precision_at_k(&[], &truth, 5), 0.0);
    }

    #[test]
    fn test_recall_denominator_is_true_set() {
        let recs = list(&["a", "b"]);
        let truth = set(&["a", "x", "y", "z"]);
        assert!((recall_at_k(&recs, &truth, 2) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_ndcg_single_relevant_at_second_position() {
        // DCG = 1/log2(3) ≈ 0.6309, IDCG = 1/log2(2) = 1.
        let recs = list(&["a", "b", "c"]);
        let truth = set(&["b"]);
        let ndcg = ndcg_at_k(&recs, &truth, 3);
        assert!((ndcg - 0.6309).abs() < 1e-3);
    }

    #[test]
    fn test_ndcg_perfect_ranking_is_one() {
        let recs = list(&["a", "b", "c"]);
        let truth = set(&["a", "b"]);
        let ndcg = ndcg_at_k(&recs, &truth, 2);
        assert!((ndcg - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ndcg_zero_when_idcg_zero() {
        let recs = list(&["a"]);
        assert_eq!(ndcg_at_k(&recs, &HashSet::new(), 3), 0.0);
        assert_eq!(ndcg_at_k(&recs, &set(&["x"]), 0), 0.0);
    }

    #[test]
    fn test_scores_stay_in_unit_interval() {
        let recs = list(&["a", "b", "c"]);
        let truth = set(&["a", "b", "c", "d"]);
        for k in 1..=5 {
            for value in [
                precision_at_k(&recs, &truth, k),
                recall_at_k(&recs, &truth, k),
                ndcg_at_k(&recs, &truth, k),
            ] {
                assert!((0.0..=1.0).contains(&value), "out of range at k={k}");
            }
        }
    }

    #[test]
    fn test_coverage_over_union_of_lists() {
        // Catalog of 4 items; lists recommend {a, b} and {a, c}.
        let lists = vec![list(&["a", "b"]), list(&["a", "c"])];
        let value = coverage(lists.iter(), 4);
        assert!((value - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_coverage_empty_catalog_is_zero() {
        let lists: Vec<Vec<String>> = vec![];
        assert_eq!(coverage(lists.iter(), 0), 0.0);
    }

    #[test]
    fn test_aggregate_excludes_users_with_empty_true_set() {
        let mut recommendations = BTreeMap::new();
        recommendations.insert("u1".to_string(), list(&["a", "b"]));
        recommendations.insert("u2".to_string(), list(&["c", "d"]));

        let mut held_out = HashMap::new();
        held_out.insert("u1".to_string(), set(&["a", "b"]));
        held_out.insert("u2".to_string(), HashSet::new());

        let eval = evaluate_strategy(&recommendations, &held_out, 2, 4);
        // Only u1 is averaged; u2 must not drag recall down to 0.5.
        assert_eq!(eval.evaluated_users, 1);
        assert!((eval.recall - 1.0).abs() < 1e-9);
        assert!((eval.precision - 1.0).abs() < 1e-9);
        // Coverage still sees u2's list: {a, b, c, d} of 4.
        assert!((eval.coverage - 1.0).abs() < 1e-9);
    }
}
