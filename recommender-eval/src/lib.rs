pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod report;
pub mod services;

pub use config::Config;
pub use error::{PipelineError, Result};
pub use services::{ExperimentRunner, Phase};
