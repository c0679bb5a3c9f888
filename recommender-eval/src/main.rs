use anyhow::Context;
use clap::Parser;
use recommender_eval::{loader, report, Config, ExperimentRunner};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Offline recommendation experiment: trains three strategies on a
/// purchase-interaction CSV and scores them with IR metrics.
#[derive(Parser, Debug)]
#[command(name = "recommender-eval", version, about)]
struct Args {
    /// Interaction CSV (retail export layout).
    input: PathBuf,

    /// Write the full JSON report here.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Keep raw per-user recommendation lists in the report.
    #[arg(long)]
    keep_recommendations: bool,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = Config::from_env().context("Failed to load config")?;
    if args.keep_recommendations {
        config.keep_recommendations = true;
    }

    info!(
        "Starting experiment: input={}, k={}, train_ratio={}",
        args.input.display(),
        config.k,
        config.train_ratio
    );

    let rows = loader::load_rows(&args.input).context("Failed to read input CSV")?;
    info!("Loaded {} raw rows", rows.len());

    let mut runner = ExperimentRunner::new(config);
    let experiment = runner.run(&rows).context("Experiment run failed")?;

    print!("{}", report::render_summary(&experiment));

    if let Some(path) = &args.output {
        report::write_json(&experiment, path).context("Failed to write report")?;
        info!("Report written to {}", path.display());
    }

    Ok(())
}
