//! Feature builder for classifier input.
//!
//! Each matchup becomes one row of `4 × k` values: home offense, home
//! defense, away offense, away defense, each in schema metric order. A
//! matchup is dropped unless all four lookups find exactly one row.

use ndarray::Array2;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::profile::{Lookup, ProfileTables};
use super::schema::{FeatureSchema, FeatureSlot};
use crate::types::Matchup;

/// Why a matchup got no feature row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DropReason {
    Missing { slot: FeatureSlot, team: String },
    Duplicate { slot: FeatureSlot, team: String, rows: usize },
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropReason::Missing { slot, team } => {
                write!(f, "{} has no {} profile", team, slot.kind().name())
            }
            DropReason::Duplicate { slot, team, rows } => {
                write!(f, "{} has {} {} profiles", team, rows, slot.kind().name())
            }
        }
    }
}

/// Feature row for one matchup
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub matchup: Matchup,
    pub values: Vec<f64>,
}

/// Stacked feature rows in discovery order
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub columns: Vec<String>,
    pub rows: Vec<FeatureRow>,
}

impl FeatureMatrix {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn matchups(&self) -> impl Iterator<Item = &Matchup> {
        self.rows.iter().map(|r| &r.matchup)
    }

    /// Model input array of shape (n_rows, width)
    pub fn to_array(&self) -> Array2<f32> {
        let mut features = Array2::<f32>::zeros((self.len(), self.width()));
        for (i, row) in self.rows.iter().enumerate() {
            for (j, &val) in row.values.iter().enumerate() {
                features[[i, j]] = val as f32;
            }
        }
        features
    }
}

/// Counts of kept and dropped matchups for one batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssemblyReport {
    pub kept: usize,
    pub dropped_missing: usize,
    pub dropped_duplicate: usize,
    pub dropped: Vec<(Matchup, DropReason)>,
}

impl AssemblyReport {
    pub fn total(&self) -> usize {
        self.kept + self.dropped_missing + self.dropped_duplicate
    }

    fn record_drop(&mut self, matchup: &Matchup, reason: DropReason) {
        match reason {
            DropReason::Missing { .. } => self.dropped_missing += 1,
            DropReason::Duplicate { .. } => self.dropped_duplicate += 1,
        }
        self.dropped.push((matchup.clone(), reason));
    }
}

/// Feature builder over one run's profile tables
pub struct FeatureBuilder<'a> {
    tables: &'a ProfileTables,
}

impl<'a> FeatureBuilder<'a> {
    pub fn new(tables: &'a ProfileTables) -> Self {
        Self { tables }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.tables.schema
    }

    /// Build the feature row for one matchup.
    ///
    /// Returns the first failing lookup, in slot order, when any of the four
    /// lookups is missing or duplicated.
    pub fn build(&self, matchup: &Matchup) -> Result<FeatureRow, DropReason> {
        let mut values = Vec::with_capacity(self.schema().width());

        for slot in FeatureSlot::ORDER {
            let team = if slot.is_home() {
                &matchup.home_team
            } else {
                &matchup.away_team
            };

            match self.tables.table(slot.kind()).lookup(team) {
                Lookup::Found(row) => values.extend_from_slice(row),
                Lookup::NotFound => {
                    return Err(DropReason::Missing {
                        slot,
                        team: team.clone(),
                    })
                }
                Lookup::Duplicate(rows) => {
                    return Err(DropReason::Duplicate {
                        slot,
                        team: team.clone(),
                        rows,
                    })
                }
            }
        }

        debug!("Built {} features for {}", values.len(), matchup);

        Ok(FeatureRow {
            matchup: matchup.clone(),
            values,
        })
    }

    /// Build rows for every matchup that resolves, keeping input order.
    pub fn build_batch(&self, matchups: &[Matchup]) -> (FeatureMatrix, AssemblyReport) {
        let mut report = AssemblyReport::default();
        let mut rows = Vec::with_capacity(matchups.len());

        for matchup in matchups {
            match self.build(matchup) {
                Ok(row) => {
                    report.kept += 1;
                    rows.push(row);
                }
                Err(reason) => {
                    warn!("Dropping {}: {}", matchup, reason);
                    report.record_drop(matchup, reason);
                }
            }
        }

        info!(
            "Assembled {} of {} matchups ({} missing, {} duplicate)",
            report.kept,
            report.total(),
            report.dropped_missing,
            report.dropped_duplicate
        );

        let matrix = FeatureMatrix {
            columns: self.schema().column_names(),
            rows,
        };

        (matrix, report)
    }
}
