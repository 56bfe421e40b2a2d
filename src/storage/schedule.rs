//! Dated schedule files (`games_M_D_YYYY.csv`).

use anyhow::{Context, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;

use super::{dated_path, read_csv, string_values, write_csv};
use crate::types::Matchup;

pub const HOME_COLUMN: &str = "home_teams";
pub const AWAY_COLUMN: &str = "away_teams";

/// Schedule file store rooted at a directory
pub struct ScheduleStore {
    dir: PathBuf,
}

impl ScheduleStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the schedule file for a date
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        dated_path(&self.dir, "games", date)
    }

    /// Write the week's matchups, replacing any previous file for the date.
    pub fn save(&self, date: NaiveDate, matchups: &[Matchup]) -> Result<PathBuf> {
        let home: Vec<&str> = matchups.iter().map(|m| m.home_team.as_str()).collect();
        let away: Vec<&str> = matchups.iter().map(|m| m.away_team.as_str()).collect();

        let mut df = df!(
            HOME_COLUMN => home,
            AWAY_COLUMN => away,
        )?;

        let path = self.path_for(date);
        write_csv(&mut df, &path)?;
        info!("Saved {} games to {}", matchups.len(), path.display());

        Ok(path)
    }

    /// Read matchups back from a schedule file, in file order.
    pub fn load(path: &Path) -> Result<Vec<Matchup>> {
        let df = read_csv(path)?;
        let home = string_values(&df, HOME_COLUMN)
            .with_context(|| format!("Bad schedule file {}", path.display()))?;
        let away = string_values(&df, AWAY_COLUMN)
            .with_context(|| format!("Bad schedule file {}", path.display()))?;

        Ok(home
            .into_iter()
            .zip(away)
            .map(|(h, a)| Matchup::new(h, a))
            .collect())
    }
}
