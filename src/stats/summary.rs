//! Yearly Summary Module
//! Stacks per-year tables and pivots accident counts into a month x year matrix.

use crate::data::{i64_values, YearTable, MONTH_COL, YEAR_COL};
use crate::error::Result;
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

const COUNT_COL: &str = "n";

/// Accident counts with one row per month and one column per year.
///
/// Cells for (month, year) pairs without accidents are null, not zero.
#[derive(Debug, Clone)]
pub struct AccidentSummary {
    frame: DataFrame,
    months: Vec<i64>,
    years: Vec<i32>,
    counts: BTreeMap<(i64, i32), u32>,
}

impl AccidentSummary {
    /// The pivoted table: a `MONTH` column followed by one column per year.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Months present in the data, ascending.
    pub fn months(&self) -> &[i64] {
        &self.months
    }

    /// Successfully loaded years, ascending.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn count(&self, month: i64, year: i32) -> Option<u32> {
        self.counts.get(&(month, year)).copied()
    }
}

/// Builds `AccidentSummary` values from `read_years` output.
pub struct SummaryCalculator;

impl SummaryCalculator {
    pub fn summarize(tables: &[YearTable]) -> Result<AccidentSummary> {
        let years: BTreeSet<i32> = tables
            .iter()
            .filter(|t| t.is_loaded())
            .map(|t| t.year())
            .collect();

        let frames: Vec<LazyFrame> = tables
            .iter()
            .filter_map(|t| t.data())
            .map(|df| {
                df.clone().lazy().select([
                    col(MONTH_COL).cast(DataType::Int64),
                    col(YEAR_COL).cast(DataType::Int64),
                ])
            })
            .collect();

        let counts = if frames.is_empty() {
            BTreeMap::new()
        } else {
            Self::count_by_year_month(frames)?
        };

        Self::pivot(counts, years.into_iter().collect())
    }

    /// Stack the frames and count rows per (month, year). Rows without a MONTH are dropped.
    fn count_by_year_month(frames: Vec<LazyFrame>) -> Result<BTreeMap<(i64, i32), u32>> {
        let grouped = concat(frames, UnionArgs::default())?
            .group_by([col(YEAR_COL), col(MONTH_COL)])
            .agg([len().alias(COUNT_COL)])
            .collect()?;

        let years = i64_values(&grouped, YEAR_COL)?;
        let months = i64_values(&grouped, MONTH_COL)?;
        let n_column = grouped.column(COUNT_COL)?.cast(&DataType::UInt32)?;
        let ns: Vec<Option<u32>> = n_column.u32()?.into_iter().collect();

        let mut counts = BTreeMap::new();
        for ((year, month), n) in years.into_iter().zip(months).zip(ns) {
            if let (Some(year), Some(month), Some(n)) = (year, month, n) {
                *counts.entry((month, year as i32)).or_insert(0) += n;
            }
        }
        Ok(counts)
    }

    fn pivot(counts: BTreeMap<(i64, i32), u32>, years: Vec<i32>) -> Result<AccidentSummary> {
        let months: Vec<i64> = counts
            .keys()
            .map(|(month, _)| *month)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut columns = vec![Column::new(MONTH_COL.into(), months.clone())];
        for year in &years {
            let cells: Vec<Option<u32>> = months
                .iter()
                .map(|month| counts.get(&(*month, *year)).copied())
                .collect();
            columns.push(Column::new(year.to_string().into(), cells));
        }

        Ok(AccidentSummary {
            frame: DataFrame::new(columns)?,
            months,
            years,
            counts,
        })
    }
}
