use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::models::{
    ExperimentReport, MetricRecord, RawRow, SplitOutcome, Strategy, StrategyRecommendations,
};
use crate::services::ingest::InteractionStore;
use crate::services::metrics;
use crate::services::recommend::{
    FrequencyProxyRecommender, NeighborhoodRecommender, PopularityRecommender, Recommender,
};
use crate::services::split::Splitter;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{error, info};

/// Pipeline phases, in execution order. `Failed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Ingesting,
    Splitting,
    GeneratingRecommendations,
    ComputingMetrics,
    ReportReady,
    Failed,
}

/// One strategy's generation output, carried into the metrics phase.
struct StrategyRun {
    strategy: Strategy,
    lists: BTreeMap<String, Vec<String>>,
    latency_ms: u64,
}

/// Orchestrates the full run: ingest → split → generate (per strategy,
/// strictly sequential) → score → report.
///
/// The same test-user set and the same `k` are used for all three
/// strategies, so cross-strategy comparison within one report is valid.
/// Any failure aborts the whole run; there is no partial report.
pub struct ExperimentRunner {
    config: Config,
    phase: Phase,
}

impl ExperimentRunner {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn run(&mut self, rows: &[RawRow]) -> Result<ExperimentReport> {
        match self.execute(rows) {
            Ok(report) => {
                self.phase = Phase::ReportReady;
                info!("Experiment complete: {} strategy records", report.records.len());
                Ok(report)
            }
            Err(err) => {
                self.phase = Phase::Failed;
                error!("Experiment aborted: {}", err);
                Err(err)
            }
        }
    }

    fn execute(&mut self, rows: &[RawRow]) -> Result<ExperimentReport> {
        self.config.validate()?;
        let k = self.config.k;

        self.phase = Phase::Ingesting;
        info!("Phase: ingesting {} raw rows", rows.len());
        let ingest = InteractionStore::ingest(rows)?;

        self.phase = Phase::Splitting;
        info!("Phase: splitting at train_ratio {}", self.config.train_ratio);
        let split = Splitter::split(&ingest.matrix, self.config.train_ratio)?;

        self.phase = Phase::GeneratingRecommendations;
        let popularity = PopularityRecommender::new(&ingest.matrix);
        let frequency = FrequencyProxyRecommender::new(&ingest.interactions, &ingest.matrix);
        let neighborhood = NeighborhoodRecommender::new(&ingest.matrix, &popularity, &self.config);

        // Strictly sequential so each strategy's latency is isolated.
        let strategies: [&dyn Recommender; 3] = [&popularity, &frequency, &neighborhood];
        let mut runs = Vec::with_capacity(strategies.len());
        for strategy in strategies {
            runs.push(self.generate(strategy, &split, k)?);
        }

        self.phase = Phase::ComputingMetrics;
        let mut records = Vec::with_capacity(runs.len());
        let mut evaluated_users = 0usize;
        for run in &runs {
            let eval = metrics::evaluate_strategy(
                &run.lists,
                &split.held_out,
                k,
                ingest.matrix.item_count(),
            );
            evaluated_users = eval.evaluated_users;
            info!(
                "Scored {}: precision={:.4} recall={:.4} ndcg={:.4} coverage={:.4} latency={}ms",
                run.strategy.as_str(),
                eval.precision,
                eval.recall,
                eval.ndcg,
                eval.coverage,
                run.latency_ms
            );
            records.push(MetricRecord {
                algorithm: run.strategy.as_str().to_string(),
                precision: eval.precision,
                recall: eval.recall,
                ndcg: eval.ndcg,
                coverage: eval.coverage,
                latency_ms: run.latency_ms,
            });
        }

        let recommendations = self.config.keep_recommendations.then(|| {
            runs.iter()
                .map(|run| StrategyRecommendations {
                    algorithm: run.strategy.as_str().to_string(),
                    by_user: run.lists.clone(),
                })
                .collect()
        });

        Ok(ExperimentReport {
            generated_at: chrono::Utc::now(),
            k,
            train_ratio: self.config.train_ratio,
            stats: ingest.stats,
            evaluated_users,
            records,
            recommendations,
        })
    }

    /// Generates lists for every test user under one strategy, timing the
    /// whole loop (latency is per strategy, not per user).
    fn generate(
        &self,
        strategy: &dyn Recommender,
        split: &SplitOutcome,
        k: usize,
    ) -> Result<StrategyRun> {
        let name = strategy.strategy().as_str();
        info!(
            "Phase: generating {} lists for {} test users (k={})",
            name,
            split.test_users.len(),
            k
        );

        let started = Instant::now();
        let mut lists = BTreeMap::new();
        for user in &split.test_users {
            let list = strategy
                .recommend(user, k)
                .map_err(|e| PipelineError::Recommendation(format!("{name} for {user}: {e}")))?;
            debug_assert!(list.len() <= k);
            lists.insert(user.clone(), list);
        }
        let latency_ms = started.elapsed().as_millis() as u64;

        Ok(StrategyRun {
            strategy: strategy.strategy(),
            lists,
            latency_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawRow;

    fn raw(user: &str, item: &str, qty: &str) -> RawRow {
        RawRow {
            customer_id: user.to_string(),
            stock_code: item.to_string(),
            description: format!("{item} description"),
            quantity: qty.to_string(),
            invoice_date: "2011-02-01 09:30".to_string(),
        }
    }

    fn sample_rows() -> Vec<RawRow> {
        vec![
            raw("u1", "a", "2"),
            raw("u1", "b", "1"),
            raw("u2", "a", "1"),
            raw("u2", "c", "3"),
            raw("u3", "b", "2"),
            raw("u3", "c", "1"),
            raw("u4", "a", "4"),
            raw("u4", "d", "1"),
            raw("u5", "c", "2"),
            raw("u5", "d", "2"),
        ]
    }

    #[test]
    fn test_run_produces_three_records_in_order() {
        let mut runner = ExperimentRunner::new(Config::default());
        let report = runner.run(&sample_rows()).expect("run succeeds");

        assert_eq!(runner.phase(), Phase::ReportReady);
        let names: Vec<&str> = report.records.iter().map(|r| r.algorithm.as_str()).collect();
        assert_eq!(names, ["popularity", "content_frequency", "neighborhood_cf"]);

        for record in &report.records {
            assert!((0.0..=1.0).contains(&record.precision));
            assert!((0.0..=1.0).contains(&record.recall));
            assert!((0.0..=1.0).contains(&record.ndcg));
            assert!((0.0..=1.0).contains(&record.coverage));
        }
    }

    #[test]
    fn test_run_fails_on_empty_input() {
        let mut runner = ExperimentRunner::new(Config::default());
        let result = runner.run(&[]);
        assert!(matches!(result, Err(PipelineError::DataValidation(_))));
        assert_eq!(runner.phase(), Phase::Failed);
    }

    #[test]
    fn test_run_fails_without_test_users() {
        let mut runner = ExperimentRunner::new(Config::default());
        let rows = vec![raw("u1", "a", "1")];
        let result = runner.run(&rows);
        assert!(matches!(result, Err(PipelineError::Split(_))));
        assert_eq!(runner.phase(), Phase::Failed);
    }

    #[test]
    fn test_recommendations_kept_only_on_request() {
        let rows = sample_rows();

        let mut quiet = ExperimentRunner::new(Config::default());
        assert!(quiet.run(&rows).expect("run").recommendations.is_none());

        let config = Config {
            keep_recommendations: true,
            ..Config::default()
        };
        let mut verbose = ExperimentRunner::new(config);
        let report = verbose.run(&rows).expect("run");
        let kept = report.recommendations.expect("lists kept");
        assert_eq!(kept.len(), 3);
        // Every strategy carries the same test-user set.
        let users: Vec<Vec<&String>> = kept.iter().map(|s| s.by_user.keys().collect()).collect();
        assert_eq!(users[0], users[1]);
        assert_eq!(users[1], users[2]);
    }

    #[test]
    fn test_invalid_config_fails_before_ingesting() {
        let config = Config {
            k: 0,
            ..Config::default()
        };
        let mut runner = ExperimentRunner::new(config);
        let result = runner.run(&sample_rows());
        assert!(matches!(result, Err(PipelineError::Config(_))));
        assert_eq!(runner.phase(), Phase::Failed);
    }
}
