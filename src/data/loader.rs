//! Accident File Loader Module
//! Handles FARS file naming, (bzip2) CSV loading and column extraction using Polars.

use crate::config::SentinelConfig;
use crate::error::{FarsError, Result};
use bzip2::read::BzDecoder;
use polars::prelude::*;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;
use tracing::debug;

pub const STATE_COL: &str = "STATE";
pub const MONTH_COL: &str = "MONTH";
pub const LONGITUDE_COL: &str = "LONGITUD";
pub const LATITUDE_COL: &str = "LATITUDE";
pub const YEAR_COL: &str = "year";

/// Canonical FARS file name for a year, e.g. `accident_2013.csv.bz2`.
pub fn build_filename(year: i32) -> String {
    format!("accident_{}.csv.bz2", year)
}

/// Parse a year given as text.
pub fn parse_year(input: &str) -> Result<i32> {
    input
        .trim()
        .parse::<i32>()
        .map_err(|_| FarsError::InvalidYear(input.to_string()))
}

/// Parse a state id given as text.
pub fn parse_state_id(input: &str) -> Result<i64> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| FarsError::InvalidStateId(input.to_string()))
}

/// Load a CSV file into a DataFrame. Files ending in `.bz2` are decompressed first.
pub fn read_table(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(FarsError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut bytes = Vec::new();
    let mut file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "bz2") {
        BzDecoder::new(file).read_to_end(&mut bytes)?;
    } else {
        file.read_to_end(&mut bytes)?;
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?;

    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded table"
    );
    Ok(df)
}

/// Load an accident file and null out sentinel coordinates.
pub fn load_accidents(path: impl AsRef<Path>, sentinels: &SentinelConfig) -> Result<DataFrame> {
    let df = read_table(path)?;
    mask_coordinate_sentinels(df, sentinels)
}

/// Rewrite LONGITUD/LATITUDE as Float64 with values above the sentinel thresholds set to null.
///
/// Columns that are absent are left alone.
pub fn mask_coordinate_sentinels(
    mut df: DataFrame,
    sentinels: &SentinelConfig,
) -> Result<DataFrame> {
    for (name, limit) in [
        (LONGITUDE_COL, sentinels.longitude),
        (LATITUDE_COL, sentinels.latitude),
    ] {
        if !has_column(&df, name) {
            continue;
        }
        let masked: Vec<Option<f64>> = f64_values(&df, name)?
            .into_iter()
            .map(|v| v.filter(|v| !v.is_nan() && *v <= limit))
            .collect();
        df.with_column(Column::new(name.into(), masked))?;
    }
    Ok(df)
}

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}

fn required_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name).map_err(|_| FarsError::MissingColumn(name.to_string()))
}

/// Column values cast to i64; unparsable cells become None.
pub fn i64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>> {
    let column = required_column(df, name)?.cast(&DataType::Int64)?;
    Ok(column.i64()?.into_iter().collect())
}

/// Column values cast to f64; unparsable cells become None.
pub fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = required_column(df, name)?.cast(&DataType::Float64)?;
    Ok(column.f64()?.into_iter().collect())
}

/// Distinct, non-null STATE values.
pub fn unique_states(df: &DataFrame) -> Result<BTreeSet<i64>> {
    Ok(i64_values(df, STATE_COL)?.into_iter().flatten().collect())
}
