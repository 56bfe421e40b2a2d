//! The weekly prediction run.
//!
//! Gate → profiles → schedule → features → classifier → predictions file.

use anyhow::Result;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use crate::config::AppConfig;
use crate::features::{AssemblyReport, FeatureBuilder, ProfileTables};
use crate::model::Classifier;
use crate::predictor::Predictor;
use crate::scraper::ScheduleSource;
use crate::storage::PredictionStore;
use crate::types::Prediction;

/// Per-invocation options
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Date identifying the target week; also names the output files
    pub date: NaiveDate,
    /// Run regardless of the configured weekday
    pub force: bool,
}

/// What a run did
#[derive(Debug, Clone, Serialize)]
pub enum RunOutcome {
    /// Gate closed; nothing was read or written
    Skipped { date: NaiveDate, run_weekday: Weekday },
    Completed(RunSummary),
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub date: NaiveDate,
    pub games_found: usize,
    pub report: AssemblyReport,
    pub predictions: Vec<Prediction>,
    pub output: PathBuf,
}

/// Whether the job should do its work on `date`.
pub fn should_run(date: NaiveDate, run_weekday: Weekday, force: bool) -> bool {
    force || date.weekday() == run_weekday
}

/// Run the weekly job.
///
/// The classifier is only loaded once the gate is open, and is not invoked
/// when no matchup survives assembly. An empty week still writes a
/// header-only predictions file.
pub async fn run_weekly<S, C, F>(
    config: &AppConfig,
    options: RunOptions,
    source: &S,
    load_classifier: F,
) -> Result<RunOutcome>
where
    S: ScheduleSource + Sync,
    C: Classifier,
    F: FnOnce(&AppConfig) -> Result<C>,
{
    let run_weekday = config.job.weekday()?;
    if !should_run(options.date, run_weekday, options.force) {
        info!(
            "{} is a {}, job runs on {}; skipping",
            options.date,
            options.date.weekday(),
            run_weekday
        );
        return Ok(RunOutcome::Skipped {
            date: options.date,
            run_weekday,
        });
    }

    let tables = ProfileTables::load(&config.profiles)?;

    let matchups = source.week_matchups(options.date).await?;

    let builder = FeatureBuilder::new(&tables);
    let (matrix, report) = builder.build_batch(&matchups);

    let classifier = load_classifier(config)?;
    let predictions = Predictor::new(&classifier).predict(&matrix)?;

    let output = PredictionStore::new(&config.predictions.output_dir)
        .save(options.date, &predictions)?;

    Ok(RunOutcome::Completed(RunSummary {
        date: options.date,
        games_found: matchups.len(),
        report,
        predictions,
        output,
    }))
}
