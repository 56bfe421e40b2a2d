//! Core record types shared by the fetcher, assembler and predictor.

use serde::{Deserialize, Serialize};

/// Decision threshold for the home team. Ties go to the home team.
pub const HOME_WIN_THRESHOLD: f64 = 0.5;

/// One scheduled contest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matchup {
    pub home_team: String,
    pub away_team: String,
}

impl Matchup {
    pub fn new(home_team: impl Into<String>, away_team: impl Into<String>) -> Self {
        Self {
            home_team: home_team.into(),
            away_team: away_team.into(),
        }
    }
}

impl std::fmt::Display for Matchup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} @ {}", self.away_team, self.home_team)
    }
}

/// Scored matchup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub home_team: String,
    pub away_team: String,
    /// Probability that the home team wins
    pub win_prob: f64,
    pub winner: String,
}

impl Prediction {
    pub fn from_probability(matchup: &Matchup, win_prob: f64) -> Self {
        let winner = if win_prob >= HOME_WIN_THRESHOLD {
            matchup.home_team.clone()
        } else {
            matchup.away_team.clone()
        };

        Self {
            home_team: matchup.home_team.clone(),
            away_team: matchup.away_team.clone(),
            win_prob,
            winner,
        }
    }
}
