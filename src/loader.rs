//! CSV loader for the daily and hourly datasets.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::records::{DailyRecord, HourlyRecord};

/// Loads `day.csv`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, a column is missing, or
/// any field (including the `dteday` date) fails to parse.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_daily(path: &Path) -> Result<Vec<DailyRecord>> {
    load_file(path).with_context(|| format!("failed to read daily records from {}", path.display()))
}

/// Loads `hour.csv`.
///
/// # Errors
///
/// Same failure modes as [`load_daily`].
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_hourly(path: &Path) -> Result<Vec<HourlyRecord>> {
    load_file(path).with_context(|| format!("failed to read hourly records from {}", path.display()))
}

fn load_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path)?;
    let rows = read_records(file)?;
    debug!(rows = rows.len(), "Loaded CSV");
    Ok(rows)
}

/// Deserializes every row of a headered CSV stream.
pub fn read_records<T: DeserializeOwned, R: Read>(reader: R) -> Result<Vec<T>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();

    for result in rdr.deserialize() {
        let record: T = result?;
        rows.push(record);
    }

    Ok(rows)
}
