//! FARS Explorer - accident data loading, monthly summaries & state maps
//!
//! Reads yearly Fatality Analysis Reporting System files
//! (`accident_<year>.csv.bz2`), counts accidents per month and year, and
//! renders accident locations for a state.

pub mod charts;
pub mod config;
pub mod data;
pub mod error;
mod fars;
mod logging;
pub mod stats;

pub use charts::{BaseMap, MapBounds, MapSurface, PngMapSurface, StateMap};
pub use config::{FarsConfig, MapConfig, SentinelConfig};
pub use data::{build_filename, parse_state_id, parse_year, read_table, YearTable};
pub use error::{FarsError, Result};
pub use fars::{FarsData, MapOutcome};
pub use logging::init_logging;
pub use stats::AccidentSummary;
