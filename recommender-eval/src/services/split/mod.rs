use crate::error::{PipelineError, Result};
use crate::models::{SplitOutcome, UserItemMatrix};
use std::collections::{HashMap, HashSet};
use tracing::info;

/// Deterministic train/test partitioner.
///
/// Users are cut at `floor(n * train_ratio)` in matrix insertion order:
/// the prefix trains, the remainder is evaluated. The cut is deliberately
/// order-preserving rather than random so downstream metric comparisons
/// are reproducible run to run.
pub struct Splitter;

impl Splitter {
    pub fn split(matrix: &UserItemMatrix, train_ratio: f64) -> Result<SplitOutcome> {
        let users = matrix.users();
        let cut = (users.len() as f64 * train_ratio).floor() as usize;

        let train_users: Vec<String> = users[..cut.min(users.len())].to_vec();
        let test_users: Vec<String> = users[cut.min(users.len())..].to_vec();

        if train_users.is_empty() || test_users.is_empty() {
            return Err(PipelineError::Split(format!(
                "train_ratio {} cannot partition {} users into non-empty train and test segments",
                train_ratio,
                users.len()
            )));
        }

        let mut held_out: HashMap<String, HashSet<String>> = HashMap::new();
        for user in &test_users {
            if let Some(row) = matrix.row(user) {
                let items = row.items();
                let take = std::cmp::max(1, items.len() / 5);
                let held: HashSet<String> = items[items.len() - take..].iter().cloned().collect();
                held_out.insert(user.clone(), held);
            }
        }

        info!(
            "Split {} users into {} train / {} test",
            users.len(),
            train_users.len(),
            test_users.len()
        );

        Ok(SplitOutcome {
            train_users,
            test_users,
            held_out,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix_with_users(specs: &[(&str, &[&str])]) -> UserItemMatrix {
        let mut matrix = UserItemMatrix::default();
        for (user, items) in specs {
            for item in *items {
                matrix.record(user, item, 1);
            }
        }
        matrix
    }

    #[test]
    fn test_split_prefix_cut() {
        let matrix = matrix_with_users(&[
            ("u1", &["a"]),
            ("u2", &["b"]),
            ("u3", &["c"]),
            ("u4", &["d"]),
            ("u5", &["e"]),
        ]);

        let outcome = Splitter::split(&matrix, 0.8).expect("split");
        assert_eq!(
            outcome.train_users,
            ["u1", "u2", "u3", "u4"].map(String::from)
        );
        assert_eq!(outcome.test_users, ["u5".to_string()]);
    }

    #[test]
    fn test_split_partitions_are_disjoint_and_cover() {
        let matrix = matrix_with_users(&[
            ("u1", &["a"]),
            ("u2", &["b"]),
            ("u3", &["c"]),
        ]);

        let outcome = Splitter::split(&matrix, 0.5).expect("split");
        let mut all = outcome.train_users.clone();
        all.extend(outcome.test_users.clone());
        assert_eq!(all, matrix.users());
        for user in &outcome.train_users {
            assert!(!outcome.test_users.contains(user));
        }
    }

    #[test]
    fn test_held_out_is_trailing_slice() {
        let matrix = matrix_with_users(&[
            ("u1", &["a"]),
            ("u2", &["p", "q", "r", "s", "t", "u", "v", "w", "x", "y", "z"]),
        ]);

        let outcome = Splitter::split(&matrix, 0.5).expect("split");
        // u2 has 11 items: held-out size = max(1, 11/5) = 2, the last two.
        let held = outcome.held_out.get("u2").expect("held-out for u2");
        assert_eq!(held.len(), 2);
        assert!(held.contains("y"));
        assert!(held.contains("z"));
    }

    #[test]
    fn test_held_out_never_empty() {
        let matrix = matrix_with_users(&[("u1", &["a"]), ("u2", &["b"])]);
        let outcome = Splitter::split(&matrix, 0.5).expect("split");
        let held = outcome.held_out.get("u2").expect("held-out for u2");
        assert_eq!(held.len(), 1);
    }

    #[test]
    fn test_split_fails_without_test_users() {
        let matrix = matrix_with_users(&[("u1", &["a"])]);
        let result = Splitter::split(&matrix, 0.8);
        assert!(matches!(result, Err(PipelineError::Split(_))));
    }
}
