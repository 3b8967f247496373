//! FARS Data Access
//! Multi-year reading, yearly summaries and state maps over a configured data directory.

use crate::charts::{BaseMap, MapBounds, MapSurface, PngMapSurface, StateMap};
use crate::config::FarsConfig;
use crate::data::{
    build_filename, load_accidents, read_table, unique_states, DataProcessor, YearTable,
};
use crate::error::{FarsError, Result};
use crate::stats::{AccidentSummary, SummaryCalculator};
use polars::prelude::DataFrame;
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Result of `map_state`.
#[derive(Debug, Clone, PartialEq)]
pub enum MapOutcome {
    Rendered { state: i64, year: i32, points: usize },
    /// The state had no accidents with usable coordinates; nothing was drawn.
    NoAccidents { state: i64, year: i32 },
}

pub struct FarsData {
    config: FarsConfig,
}

impl Default for FarsData {
    fn default() -> Self {
        Self::new(FarsConfig::default())
    }
}

impl FarsData {
    pub fn new(config: FarsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FarsConfig {
        &self.config
    }

    /// Path of the accident file for `year` inside the data directory.
    pub fn year_path(&self, year: i32) -> PathBuf {
        self.config.data_dir.join(build_filename(year))
    }

    /// Load one year and project it to `[MONTH, year]`.
    pub fn read_year(&self, year: i32) -> Result<DataFrame> {
        let df = read_table(self.year_path(year))?;
        DataProcessor::month_year_projection(&df, year)
    }

    /// Read every requested year. A failing year yields a warning entry instead of aborting.
    ///
    /// The output is aligned with `years`.
    pub fn read_years(&self, years: &[i32]) -> Vec<YearTable> {
        let read_one = |&year: &i32| match self.read_year(year) {
            Ok(df) => YearTable::loaded(year, df),
            Err(e) => {
                let warning = format!("invalid year: {}", year);
                warn!("{} ({})", warning, e);
                YearTable::failed(year, warning)
            }
        };

        if self.config.parallel {
            years.par_iter().map(read_one).collect()
        } else {
            years.iter().map(read_one).collect()
        }
    }

    /// Month x year accident counts for the years that load.
    pub fn summarize_years(&self, years: &[i32]) -> Result<AccidentSummary> {
        let tables = self.read_years(years);
        let summary = SummaryCalculator::summarize(&tables)?;
        debug!(
            months = summary.months().len(),
            years = summary.years().len(),
            "summarized years"
        );
        Ok(summary)
    }

    /// Plot one state's accidents for a year onto `surface`.
    pub fn map_state<S: MapSurface>(
        &self,
        state: i64,
        year: i32,
        surface: &mut S,
    ) -> Result<MapOutcome> {
        let df = load_accidents(self.year_path(year), &self.config.sentinels)?;

        if !unique_states(&df)?.contains(&state) {
            return Err(FarsError::InvalidState { state });
        }

        let subset = DataProcessor::filter_by_state(&df, state)?;
        let points = if subset.height() == 0 {
            Vec::new()
        } else {
            DataProcessor::valid_coordinates(&subset)?
        };

        let Some(bounds) = MapBounds::from_points(&points, self.config.map.padding_deg) else {
            info!(state, year, "no accidents to plot");
            return Ok(MapOutcome::NoAccidents { state, year });
        };

        surface.draw(&StateMap {
            state,
            year,
            bounds,
            points: &points,
        })?;

        Ok(MapOutcome::Rendered {
            state,
            year,
            points: points.len(),
        })
    }

    /// `map_state` onto a PNG file in the configured output directory.
    pub fn map_state_png(&self, state: i64, year: i32) -> Result<(MapOutcome, Option<PathBuf>)> {
        let mut surface = PngMapSurface::new(&self.config.output_dir, self.config.map)
            .with_open_rendered(self.config.open_rendered);
        if self.config.map.draw_boundaries {
            surface = surface.with_base_map(BaseMap::us_states()?);
        }
        let outcome = self.map_state(state, year, &mut surface)?;
        Ok((outcome, surface.rendered().first().cloned()))
    }
}
