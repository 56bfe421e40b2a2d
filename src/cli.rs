//! CLI commands for cfb-picks.
//!
//! The weekly job, a schedule-only fetch, and a feature schema dump.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;

use crate::config::AppConfig;
use crate::features::ProfileTables;
use crate::job::{run_weekly, RunOptions, RunOutcome, RunSummary};
use crate::model::OnnxClassifier;
use crate::scraper::{ScheduleFetcher, ScheduleSource, StoredSchedule};
use crate::types::Matchup;

#[derive(Parser)]
#[command(name = "cfb-picks")]
#[command(version, about = "Weekly college football winner predictions", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the weekly prediction job
    Run {
        /// Run even if today is not the configured weekday
        #[arg(short, long)]
        force: bool,

        /// Date within the target week (defaults to today)
        #[arg(short, long, value_name = "YYYY-MM-DD")]
        date: Option<NaiveDate>,

        /// Use a saved schedule file instead of scraping
        #[arg(short, long, value_name = "FILE")]
        schedule: Option<PathBuf>,

        /// Model path override
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Output format (json, table)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Fetch and save the week's schedule
    Fetch {
        /// Date within the target week (defaults to today)
        #[arg(short, long, value_name = "YYYY-MM-DD")]
        date: Option<NaiveDate>,
    },

    /// Print the feature columns built from the profile tables
    Schema {
        /// Output format (json, table)
        #[arg(long, default_value = "table")]
        format: String,
    },
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Run the weekly job.
///
/// Failures of an unforced run are logged and swallowed; a forced run
/// returns them to the caller.
pub async fn run_job(
    force: bool,
    date: Option<NaiveDate>,
    schedule: Option<PathBuf>,
    model_path: Option<PathBuf>,
    format: String,
) -> Result<()> {
    let options = RunOptions {
        date: date.unwrap_or_else(today),
        force,
    };

    match configure_and_run(options, schedule, model_path).await {
        Ok(outcome) => print_outcome(&outcome, &format),
        Err(e) if !force => {
            error!("Weekly run failed: {:#}", e);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

async fn configure_and_run(
    options: RunOptions,
    schedule: Option<PathBuf>,
    model_path: Option<PathBuf>,
) -> Result<RunOutcome> {
    let mut config = AppConfig::load()?;

    if let Some(path) = model_path {
        config.model.path = path.to_string_lossy().to_string();
    }

    match schedule {
        Some(path) => execute(&config, options, &StoredSchedule::new(path)).await,
        None => {
            let fetcher = ScheduleFetcher::new(&config.schedule)?;
            execute(&config, options, &fetcher).await
        }
    }
}

async fn execute<S: ScheduleSource + Sync>(
    config: &AppConfig,
    options: RunOptions,
    source: &S,
) -> Result<RunOutcome> {
    run_weekly(config, options, source, |config| {
        OnnxClassifier::from_config(&config.model)
    })
    .await
}

/// Fetch and persist the schedule only.
pub async fn run_fetch(date: Option<NaiveDate>) -> Result<()> {
    let config = AppConfig::load()?;
    let date = date.unwrap_or_else(today);

    let fetcher = ScheduleFetcher::new(&config.schedule)?;
    let matchups = fetcher.week_matchups(date).await?;

    print_matchups(date, &matchups);

    Ok(())
}

/// Print the feature schema derived from the profile tables.
pub fn run_schema(format: String) -> Result<()> {
    let config = AppConfig::load()?;
    let tables = ProfileTables::load(&config.profiles)?;
    let columns = tables.schema.column_names();

    match format.as_str() {
        "json" => {
            let schema = serde_json::json!({
                "metrics": tables.schema.metrics(),
                "columns": columns,
            });
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        _ => {
            println!(
                "=== Feature schema: {} metrics x 4 = {} columns ===",
                tables.schema.metric_count(),
                columns.len()
            );
            for (i, name) in columns.iter().enumerate() {
                println!("  {:3}. {}", i, name);
            }
        }
    }

    Ok(())
}

fn print_outcome(outcome: &RunOutcome, format: &str) -> Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(outcome)?);
        }
        "table" => print_table(outcome),
        _ => {
            eprintln!("Unknown format: {}. Using table.", format);
            print_table(outcome);
        }
    }

    Ok(())
}

/// Print run results in table format.
fn print_table(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Skipped { date, run_weekday } => {
            println!(
                "Skipped: {} is not a {} (use --force to run anyway)",
                date, run_weekday
            );
        }
        RunOutcome::Completed(summary) => print_summary(summary),
    }
}

fn print_summary(summary: &RunSummary) {
    println!("Week of {}", summary.date);
    println!(
        "Games: {} found, {} scored, {} dropped",
        summary.games_found,
        summary.report.kept,
        summary.report.dropped.len()
    );
    println!();

    if !summary.predictions.is_empty() {
        println!("=== Predictions ===");
        for p in &summary.predictions {
            println!(
                "  {:>24} @ {:<24} p(home) {:5.1}%  -> {}",
                p.away_team,
                p.home_team,
                p.win_prob * 100.0,
                p.winner
            );
        }
        println!();
    }

    if !summary.report.dropped.is_empty() {
        println!("=== Dropped ===");
        for (matchup, reason) in &summary.report.dropped {
            println!("  {}: {}", matchup, reason);
        }
        println!();
    }

    println!("Saved to {}", summary.output.display());
}

fn print_matchups(date: NaiveDate, matchups: &[Matchup]) {
    println!("=== Schedule for week of {} ({} games) ===", date, matchups.len());
    for m in matchups {
        println!("  {}", m);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_flags() {
        let cli = Cli::try_parse_from([
            "cfb-picks",
            "run",
            "--force",
            "--date",
            "2024-11-30",
            "--schedule",
            "schedules/games_11_30_2024.csv",
        ])
        .unwrap();

        match cli.command {
            Commands::Run {
                force,
                date,
                schedule,
                model,
                format,
            } => {
                assert!(force);
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 11, 30));
                assert_eq!(schedule, Some(PathBuf::from("schedules/games_11_30_2024.csv")));
                assert!(model.is_none());
                assert_eq!(format, "table");
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_parse_run_defaults() {
        let cli = Cli::try_parse_from(["cfb-picks", "run"]).unwrap();
        match cli.command {
            Commands::Run { force, date, .. } => {
                assert!(!force);
                assert!(date.is_none());
            }
            _ => panic!("expected run command"),
        }
    }

    #[tokio::test]
    async fn test_bad_config_fails_only_forced_runs() {
        std::env::set_var("CFB_JOB__RUN_WEEKDAY", "someday");
        let date = NaiveDate::from_ymd_opt(2024, 11, 30);

        let unforced = run_job(false, date, None, None, "table".to_string()).await;
        let forced = run_job(true, date, None, None, "table".to_string()).await;
        std::env::remove_var("CFB_JOB__RUN_WEEKDAY");

        assert!(unforced.is_ok());
        let err = forced.unwrap_err();
        assert!(format!("{:#}", err).contains("someday"));
    }

    #[test]
    fn test_parse_bad_date() {
        assert!(Cli::try_parse_from(["cfb-picks", "fetch", "--date", "11/30/2024"]).is_err());
    }
}
