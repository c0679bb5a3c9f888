use crate::error::{PipelineError, Result};
use serde::Deserialize;
use std::env;
use std::fmt::Display;
use std::str::FromStr;

/// Experiment configuration. Every knob has a default; none are discovered
/// dynamically.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Recommendation list size.
    pub k: usize,
    /// Fraction of users assigned to the train segment.
    pub train_ratio: f64,
    /// Neighbors considered per user in the CF strategy.
    pub k_neighbors: usize,
    /// Users the CF strategy processes before falling back to popularity.
    pub user_processing_cap: usize,
    /// Candidate neighbors sampled per processed user.
    pub neighbor_sample_cap: usize,
    /// Keep raw per-user recommendation lists in the report.
    pub keep_recommendations: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            k: 10,
            train_ratio: 0.8,
            k_neighbors: 3,
            user_processing_cap: 100,
            neighbor_sample_cap: 50,
            keep_recommendations: false,
        }
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| PipelineError::Config(format!("{key}={raw} is invalid: {e}"))),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let defaults = Config::default();
        let config = Config {
            k: env_or("EVAL_K", defaults.k)?,
            train_ratio: env_or("EVAL_TRAIN_RATIO", defaults.train_ratio)?,
            k_neighbors: env_or("EVAL_K_NEIGHBORS", defaults.k_neighbors)?,
            user_processing_cap: env_or("EVAL_USER_PROCESSING_CAP", defaults.user_processing_cap)?,
            neighbor_sample_cap: env_or("EVAL_NEIGHBOR_SAMPLE_CAP", defaults.neighbor_sample_cap)?,
            keep_recommendations: env_or("EVAL_KEEP_RECOMMENDATIONS", defaults.keep_recommendations)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the pipeline cannot run with. No silent clamping.
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(PipelineError::Config("k must be >= 1".to_string()));
        }
        if !(self.train_ratio > 0.0 && self.train_ratio < 1.0) {
            return Err(PipelineError::Config(format!(
                "train_ratio must be in (0, 1), got {}",
                self.train_ratio
            )));
        }
        if self.k_neighbors == 0 {
            return Err(PipelineError::Config("k_neighbors must be >= 1".to_string()));
        }
        if self.user_processing_cap == 0 {
            return Err(PipelineError::Config(
                "user_processing_cap must be >= 1".to_string(),
            ));
        }
        if self.neighbor_sample_cap == 0 {
            return Err(PipelineError::Config(
                "neighbor_sample_cap must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}
