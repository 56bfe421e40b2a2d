//! cfb-picks
//!
//! Weekly batch job predicting college football winners from a scraped
//! schedule, team offense/defense profiles and a pre-trained classifier.

mod cli;
mod config;
mod features;
mod job;
mod model;
mod predictor;
mod scraper;
mod storage;
mod types;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cfb_picks=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            force,
            date,
            schedule,
            model,
            format,
        } => cli::run_job(force, date, schedule, model, format).await,
        Commands::Fetch { date } => cli::run_fetch(date).await,
        Commands::Schema { format } => cli::run_schema(format),
    }
}
