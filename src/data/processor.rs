//! Data Processor Module
//! Per-year tagging/projection, state filtering and coordinate extraction.

use super::loader::{
    f64_values, has_column, LATITUDE_COL, LONGITUDE_COL, MONTH_COL, STATE_COL, YEAR_COL,
};
use crate::error::{FarsError, Result};
use polars::prelude::*;

/// Outcome of loading one requested year: either the `[MONTH, year]`
/// projection of its accidents or a warning, never both.
#[derive(Debug, Clone)]
pub struct YearTable {
    year: i32,
    outcome: std::result::Result<DataFrame, String>,
}

impl YearTable {
    pub fn loaded(year: i32, data: DataFrame) -> Self {
        Self {
            year,
            outcome: Ok(data),
        }
    }

    pub fn failed(year: i32, warning: String) -> Self {
        Self {
            year,
            outcome: Err(warning),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn data(&self) -> Option<&DataFrame> {
        self.outcome.as_ref().ok()
    }

    pub fn warning(&self) -> Option<&str> {
        self.outcome.as_ref().err().map(String::as_str)
    }

    pub fn into_data(self) -> Option<DataFrame> {
        self.outcome.ok()
    }

    pub fn is_loaded(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Handles row tagging and filtering on accident tables.
pub struct DataProcessor;

impl DataProcessor {
    /// Tag every row with `year` and keep only `[MONTH, year]`.
    pub fn month_year_projection(df: &DataFrame, year: i32) -> Result<DataFrame> {
        if !has_column(df, MONTH_COL) {
            return Err(FarsError::MissingColumn(MONTH_COL.to_string()));
        }

        let projected = df
            .clone()
            .lazy()
            .with_column(lit(year).alias(YEAR_COL))
            .select([col(MONTH_COL), col(YEAR_COL)])
            .collect()?;
        Ok(projected)
    }

    /// Rows whose STATE equals `state`.
    pub fn filter_by_state(df: &DataFrame, state: i64) -> Result<DataFrame> {
        if !has_column(df, STATE_COL) {
            return Err(FarsError::MissingColumn(STATE_COL.to_string()));
        }

        let filtered = df
            .clone()
            .lazy()
            .filter(col(STATE_COL).cast(DataType::Int64).eq(lit(state)))
            .collect()?;
        Ok(filtered)
    }

    /// `(longitude, latitude)` pairs where both values are present.
    pub fn valid_coordinates(df: &DataFrame) -> Result<Vec<(f64, f64)>> {
        let lons = f64_values(df, LONGITUDE_COL)?;
        let lats = f64_values(df, LATITUDE_COL)?;

        Ok(lons
            .into_iter()
            .zip(lats)
            .filter_map(|(lon, lat)| Some((lon?, lat?)))
            .filter(|(lon, lat)| !lon.is_nan() && !lat.is_nan())
            .collect())
    }
}
