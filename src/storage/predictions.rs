//! Dated prediction files (`predictions_M_D_YYYY.csv`).

use anyhow::Result;
use chrono::NaiveDate;
use polars::prelude::*;
use std::path::PathBuf;
use tracing::info;

use super::schedule::{AWAY_COLUMN, HOME_COLUMN};
use super::{dated_path, write_csv};
use crate::types::Prediction;

pub const WIN_PROB_COLUMN: &str = "win_prob";
pub const WINNER_COLUMN: &str = "winner";

/// Prediction file store rooted at a directory
pub struct PredictionStore {
    dir: PathBuf,
}

impl PredictionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        dated_path(&self.dir, "predictions", date)
    }

    /// Write predictions in the given order. An empty slice still writes the header.
    pub fn save(&self, date: NaiveDate, predictions: &[Prediction]) -> Result<PathBuf> {
        let home: Vec<&str> = predictions.iter().map(|p| p.home_team.as_str()).collect();
        let away: Vec<&str> = predictions.iter().map(|p| p.away_team.as_str()).collect();
        let probs: Vec<f64> = predictions.iter().map(|p| p.win_prob).collect();
        let winners: Vec<&str> = predictions.iter().map(|p| p.winner.as_str()).collect();

        let mut df = df!(
            HOME_COLUMN => home,
            AWAY_COLUMN => away,
            WIN_PROB_COLUMN => probs,
            WINNER_COLUMN => winners,
        )?;

        let path = self.path_for(date);
        write_csv(&mut df, &path)?;
        info!("Saved {} predictions to {}", predictions.len(), path.display());

        Ok(path)
    }
}

#[cfg(test)]
impl PredictionStore {
    /// Read predictions back, in file order.
    pub fn load(path: &std::path::Path) -> Result<Vec<Prediction>> {
        use super::{read_csv, string_values};
        use anyhow::Context;

        let df = read_csv(path)?;

        let home = string_values(&df, HOME_COLUMN)?;
        let away = string_values(&df, AWAY_COLUMN)?;
        let winners = string_values(&df, WINNER_COLUMN)?;

        let probs = df
            .column(WIN_PROB_COLUMN)
            .with_context(|| format!("Missing column {:?}", WIN_PROB_COLUMN))?
            .cast(&DataType::Float64)?;
        let probs: Vec<f64> = probs
            .f64()?
            .into_iter()
            .enumerate()
            .map(|(i, p)| p.with_context(|| format!("Empty win_prob at row {}", i)))
            .collect::<Result<_>>()?;

        let predictions = home
            .into_iter()
            .zip(away)
            .zip(probs)
            .zip(winners)
            .map(|(((home_team, away_team), win_prob), winner)| Prediction {
                home_team,
                away_team,
                win_prob,
                winner,
            })
            .collect();

        Ok(predictions)
    }
}
