//! CSV storage for dated schedules and predictions
//!
//! Every run writes one file per date; a second run for the same date
//! overwrites it.

pub mod predictions;
pub mod schedule;

pub use predictions::PredictionStore;
pub use schedule::ScheduleStore;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Dated file name: `{prefix}_{month}_{day}_{year}.csv` (no zero padding)
pub fn dated_file_name(prefix: &str, date: NaiveDate) -> String {
    format!(
        "{}_{}_{}_{}.csv",
        prefix,
        date.month(),
        date.day(),
        date.year()
    )
}

/// Write a frame as CSV with header, creating parent directories.
fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}

/// Read a CSV file with header.
///
/// Column types are inferred from every row, so a decimal value late in an
/// otherwise integer column still reads.
pub(crate) fn read_csv(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("Failed to open {}", path.display()))?
        .finish()
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(df)
}

/// Read a column as strings, failing on missing cells.
fn string_values(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let column = df
        .column(name)
        .with_context(|| format!("Missing column {:?}", name))?
        .cast(&DataType::String)?;

    column
        .str()?
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
            v.map(str::to_string)
                .with_context(|| format!("Empty {:?} at row {}", name, i))
        })
        .collect()
}

fn dated_path(dir: &Path, prefix: &str, date: NaiveDate) -> PathBuf {
    dir.join(dated_file_name(prefix, date))
}
