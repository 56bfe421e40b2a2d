//! Team statistical profile tables.
//!
//! Loads the offense and defense CSVs, keeps only the metric columns the
//! feature schema uses and answers per-team lookups.

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use serde::Serialize;
use std::path::Path;
use tracing::info;

use super::schema::FeatureSchema;
use crate::config::ProfilesConfig;
use crate::storage::read_csv;

/// Profile table type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProfileKind {
    Offense,
    Defense,
}

impl ProfileKind {
    pub fn name(&self) -> &'static str {
        match self {
            ProfileKind::Offense => "offense",
            ProfileKind::Defense => "defense",
        }
    }
}

/// Result of looking a team up in a profile table
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<'a> {
    Found(&'a [f64]),
    NotFound,
    /// Number of rows sharing the team identifier
    Duplicate(usize),
}

/// One profile table projected onto the schema metrics
#[derive(Debug, Clone)]
pub struct ProfileTable {
    /// Team identifier per row, `None` for empty cells
    teams: Vec<Option<String>>,
    /// Row-major metric values in schema order
    rows: Vec<Vec<f64>>,
}

impl ProfileTable {
    /// Metric columns of a frame: everything except the team column and
    /// columns carrying the exclusion marker, in file order.
    pub fn metric_columns(df: &DataFrame, team_column: &str, exclude_marker: &str) -> Vec<String> {
        df.get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .filter(|name| name != team_column && !name.contains(exclude_marker))
            .collect()
    }

    /// Build a table from a frame, keeping `metrics` in the given order.
    ///
    /// Fails if a metric column is missing or holds non-numeric values.
    /// Empty metric cells become NaN.
    pub fn from_frame(
        df: &DataFrame,
        kind: ProfileKind,
        team_column: &str,
        metrics: &[String],
    ) -> Result<Self> {
        let team_col = df
            .column(team_column)
            .with_context(|| format!("{} table has no {:?} column", kind.name(), team_column))?
            .cast(&DataType::String)?;
        let teams: Vec<Option<String>> = team_col
            .str()?
            .into_iter()
            .map(|t| t.map(str::to_string))
            .collect();

        let mut columns = Vec::with_capacity(metrics.len());
        for metric in metrics {
            let raw = df.column(metric).with_context(|| {
                format!("{} table has no metric column {:?}", kind.name(), metric)
            })?;
            let numeric = raw.cast(&DataType::Float64).with_context(|| {
                format!("{} column {:?} is not numeric", kind.name(), metric)
            })?;
            if numeric.null_count() > raw.null_count() {
                bail!(
                    "{} column {:?} has {} non-numeric values",
                    kind.name(),
                    metric,
                    numeric.null_count() - raw.null_count()
                );
            }
            let values: Vec<f64> = numeric
                .f64()?
                .into_iter()
                .map(|v| v.unwrap_or(f64::NAN))
                .collect();
            columns.push(values);
        }

        let rows = (0..df.height())
            .map(|i| columns.iter().map(|col| col[i]).collect())
            .collect();

        Ok(Self { teams, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Look up a team's metric row.
    pub fn lookup(&self, team: &str) -> Lookup<'_> {
        let mut matches = self
            .teams
            .iter()
            .enumerate()
            .filter(|(_, t)| t.as_deref() == Some(team))
            .map(|(i, _)| i);

        let Some(first) = matches.next() else {
            return Lookup::NotFound;
        };

        match matches.count() {
            0 => Lookup::Found(&self.rows[first]),
            extra => Lookup::Duplicate(extra + 1),
        }
    }
}

/// Offense and defense tables sharing one feature schema
#[derive(Debug, Clone)]
pub struct ProfileTables {
    pub schema: FeatureSchema,
    pub offense: ProfileTable,
    pub defense: ProfileTable,
}

impl ProfileTables {
    /// Load both tables from the configured CSV paths.
    pub fn load(config: &ProfilesConfig) -> Result<Self> {
        let offense = read_csv(Path::new(&config.offense_path))
            .context("Failed to load offense profiles")?;
        let defense = read_csv(Path::new(&config.defense_path))
            .context("Failed to load defense profiles")?;

        let tables = Self::from_frames(&offense, &defense, config)?;
        info!(
            "Loaded profiles: {} offense rows, {} defense rows, {} metrics",
            tables.offense.len(),
            tables.defense.len(),
            tables.schema.metric_count()
        );

        Ok(tables)
    }

    /// Build both tables. The metric set comes from the offense frame; the
    /// defense frame must provide every one of those columns.
    pub fn from_frames(
        offense: &DataFrame,
        defense: &DataFrame,
        config: &ProfilesConfig,
    ) -> Result<Self> {
        let metrics =
            ProfileTable::metric_columns(offense, &config.team_column, &config.exclude_marker);
        if metrics.is_empty() {
            bail!("offense table has no metric columns");
        }

        let offense = ProfileTable::from_frame(
            offense,
            ProfileKind::Offense,
            &config.team_column,
            &metrics,
        )?;
        let defense = ProfileTable::from_frame(
            defense,
            ProfileKind::Defense,
            &config.team_column,
            &metrics,
        )?;

        Ok(Self {
            schema: FeatureSchema::new(metrics),
            offense,
            defense,
        })
    }

    pub fn table(&self, kind: ProfileKind) -> &ProfileTable {
        match kind {
            ProfileKind::Offense => &self.offense,
            ProfileKind::Defense => &self.defense,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offense_frame() -> DataFrame {
        df!(
            "team" => ["alpha", "beta", "gamma", "gamma"],
            "ppg" => [31.5, 24.0, 17.2, 18.0],
            "ypp_remove" => [6.1, 5.2, 4.9, 4.8],
            "rush_ypg" => [180i64, 120, 95, 101],
        )
        .unwrap()
    }

    fn defense_frame() -> DataFrame {
        df!(
            "team" => ["beta", "alpha", "gamma"],
            "rush_ypg" => [140.0, 110.0, 160.0],
            "ppg" => [21.0, 17.5, 30.1],
            "extra" => [1.0, 2.0, 3.0],
        )
        .unwrap()
    }

    #[test]
    fn test_metric_columns_drop_team_and_excluded() {
        let metrics = ProfileTable::metric_columns(&offense_frame(), "team", "remove");
        assert_eq!(metrics, vec!["ppg", "rush_ypg"]);
    }

    #[test]
    fn test_lookup_found_not_found_duplicate() {
        let tables = ProfileTables::from_frames(
            &offense_frame(),
            &defense_frame(),
            &ProfilesConfig::default(),
        )
        .unwrap();

        assert_eq!(tables.offense.lookup("alpha"), Lookup::Found(&[31.5, 180.0][..]));
        assert_eq!(tables.offense.lookup("omega"), Lookup::NotFound);
        assert_eq!(tables.offense.lookup("gamma"), Lookup::Duplicate(2));
        assert_eq!(tables.defense.lookup("gamma"), Lookup::Found(&[30.1, 160.0][..]));
    }

    #[test]
    fn test_defense_projected_onto_offense_metrics() {
        let tables = ProfileTables::from_frames(
            &offense_frame(),
            &defense_frame(),
            &ProfilesConfig::default(),
        )
        .unwrap();

        assert_eq!(tables.schema.metrics(), &["ppg".to_string(), "rush_ypg".to_string()]);
        // defense columns reordered to schema order, "extra" ignored
        assert_eq!(tables.defense.lookup("alpha"), Lookup::Found(&[17.5, 110.0][..]));
    }

    #[test]
    fn test_defense_missing_metric_is_fatal() {
        let defense = df!(
            "team" => ["alpha"],
            "ppg" => [17.5],
        )
        .unwrap();

        let err = ProfileTables::from_frames(&offense_frame(), &defense, &ProfilesConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("rush_ypg"));
    }

    #[test]
    fn test_non_numeric_metric_is_fatal() {
        let offense = df!(
            "team" => ["alpha", "beta"],
            "ppg" => ["31.5", "n/a"],
        )
        .unwrap();
        let defense = df!(
            "team" => ["alpha", "beta"],
            "ppg" => [17.5, 20.0],
        )
        .unwrap();

        let config = ProfilesConfig::default();
        assert!(ProfileTables::from_frames(&offense, &defense, &config).is_err());
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let offense = df!(
            "team" => ["alpha"],
            "ppg" => ["31.5"],
        )
        .unwrap();
        let defense = df!(
            "team" => ["alpha"],
            "ppg" => [17.5],
        )
        .unwrap();

        let tables =
            ProfileTables::from_frames(&offense, &defense, &ProfilesConfig::default()).unwrap();
        assert_eq!(tables.offense.lookup("alpha"), Lookup::Found(&[31.5][..]));
    }

    #[test]
    fn test_missing_team_column() {
        let offense = df!("school" => ["alpha"], "ppg" => [31.5]).unwrap();
        let defense = df!("team" => ["alpha"], "ppg" => [17.5]).unwrap();

        let config = ProfilesConfig::default();
        assert!(ProfileTables::from_frames(&offense, &defense, &config).is_err());
    }

    #[test]
    fn test_load_from_csv() {
        let dir = tempfile::tempdir().unwrap();
        let offense_path = dir.path().join("offense.csv");
        let defense_path = dir.path().join("defense.csv");
        std::fs::write(
            &offense_path,
            "team,ppg,games_remove\nalpha,31.5,12\nbeta,24,12\n",
        )
        .unwrap();
        std::fs::write(&defense_path, "team,ppg\nalpha,17.5\nbeta,\n").unwrap();

        let config = ProfilesConfig {
            offense_path: offense_path.to_string_lossy().to_string(),
            defense_path: defense_path.to_string_lossy().to_string(),
            ..Default::default()
        };
        let tables = ProfileTables::load(&config).unwrap();

        assert_eq!(tables.schema.metric_count(), 1);
        assert_eq!(tables.offense.lookup("beta"), Lookup::Found(&[24.0][..]));
        match tables.defense.lookup("beta") {
            Lookup::Found(row) => assert!(row[0].is_nan()),
            other => panic!("unexpected lookup: {:?}", other),
        }
    }

    #[test]
    fn test_load_late_decimal_in_integer_column() {
        let dir = tempfile::tempdir().unwrap();
        let offense_path = dir.path().join("offense.csv");
        let defense_path = dir.path().join("defense.csv");

        let mut offense = String::from("team,ppg\n");
        let mut defense = String::from("team,ppg\n");
        for i in 0..134 {
            if i < 120 {
                offense.push_str(&format!("team-{},{}\n", i, 20 + i % 15));
            } else {
                offense.push_str(&format!("team-{},{}.5\n", i, 20 + i % 15));
            }
            defense.push_str(&format!("team-{},{}\n", i, 30 - i % 10));
        }
        std::fs::write(&offense_path, offense).unwrap();
        std::fs::write(&defense_path, defense).unwrap();

        let config = ProfilesConfig {
            offense_path: offense_path.to_string_lossy().to_string(),
            defense_path: defense_path.to_string_lossy().to_string(),
            ..Default::default()
        };
        let tables = ProfileTables::load(&config).unwrap();

        assert_eq!(tables.offense.len(), 134);
        assert_eq!(tables.offense.lookup("team-0"), Lookup::Found(&[20.0][..]));
        // 20 + 130 % 15 = 30
        assert_eq!(tables.offense.lookup("team-130"), Lookup::Found(&[30.5][..]));
        assert_eq!(tables.defense.lookup("team-133"), Lookup::Found(&[27.0][..]));
    }
}
