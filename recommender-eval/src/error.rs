//! Unified error handling for the evaluation pipeline.
//!
//! Every fatal condition propagates to the top-level runner call; there is
//! no degraded or partial-report mode.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Fatal pipeline failures, tagged by the phase that produced them.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "error_type", content = "details")]
pub enum PipelineError {
    /// No valid interactions survived ingestion filtering.
    #[error("Data validation failed: {0}")]
    DataValidation(String),

    /// Train/test partitioning cannot produce a usable test set.
    #[error("Train/test split failed: {0}")]
    Split(String),

    /// A strategy's generation step failed unexpectedly.
    #[error("Recommendation generation failed: {0}")]
    Recommendation(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// File boundary error (CSV input, report output)
    #[error("I/O error: {0}")]
    Io(String),
}
